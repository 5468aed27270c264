//! HTTP client for the insight service
//!
//! Every failure is mapped into one of a small taxonomy so callers can
//! produce distinct user-facing messages. A 200 response whose body is
//! missing required fields is a failure (`MalformedResponse`) even though
//! the HTTP status was successful.

use crate::models::{BusinessInsight, BusinessQuery};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default service address used by the dashboard
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Short timeout for liveness probes
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for data-bearing requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure taxonomy for service requests
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Cannot connect to server")]
    Unreachable,

    #[error("Server error ({0})")]
    Server(u16),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server response was missing required fields")]
    MalformedResponse,
}

impl ApiError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::MalformedResponse
        } else {
            ApiError::Unreachable
        }
    }
}

/// Headline-only payload returned by /regenerate-headline
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlinePayload {
    pub headline: String,
    pub timestamp: String,
}

/// Typed client for the insight service endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the data-request timeout. Tests use this to exercise the
    /// timeout path against a deliberately slow endpoint.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe against /health with a short timeout. Used only for
    /// reachability decisions, never for business logic.
    pub async fn check_health(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;
        matches!(result, Ok(response) if response.status().is_success())
    }

    /// Fetch an insight record. The payload is shape-validated: all fields
    /// of [`BusinessInsight`] must be present and well-typed.
    pub async fn business_data(&self, query: &BusinessQuery) -> Result<BusinessInsight, ApiError> {
        let response = self
            .http
            .post(format!("{}/business-data", self.base_url))
            .timeout(self.request_timeout)
            .json(query)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check_status(response).await?;
        response
            .json::<BusinessInsight>()
            .await
            .map_err(|_| ApiError::MalformedResponse)
    }

    /// Request a fresh headline for an existing record.
    pub async fn regenerate_headline(
        &self,
        query: &BusinessQuery,
    ) -> Result<HeadlinePayload, ApiError> {
        let response = self
            .http
            .get(format!("{}/regenerate-headline", self.base_url))
            .timeout(self.request_timeout)
            .query(&[("name", &query.name), ("location", &query.location)])
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check_status(response).await?;
        response
            .json::<HeadlinePayload>()
            .await
            .map_err(|_| ApiError::MalformedResponse)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.is_server_error() {
            return Err(ApiError::Server(status.as_u16()));
        }

        // 4xx: surface the machine-readable error field when present
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|e| e.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| "Request rejected".to_string());
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
