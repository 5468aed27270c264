//! Dashboard orchestration: local validation, request dispatch, fallback
//!
//! Every submission produces exactly one insight record in state: either
//! the server's response or a locally synthesized fallback, never a merge
//! of both. A newer submission supersedes an older in-flight one.

use super::api::ApiClient;
use super::monitor::ServerMonitor;
use super::store::{reduce, Action, ClientState, FormData};
use crate::generator::InsightGenerator;
use crate::models::{validate_field, BusinessInsight, BusinessQuery, FieldError};
use crate::utils::lock_mutex_recover;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Field-level validation errors surfaced before any network traffic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub name: Option<FieldError>,
    pub location: Option<FieldError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none()
    }
}

/// Client-side orchestrator owning the state container
pub struct Dashboard {
    api: ApiClient,
    monitor: Arc<ServerMonitor>,
    generator: InsightGenerator,
    state: Mutex<ClientState>,
    /// Epoch of the newest submission; stale results are discarded
    submit_epoch: AtomicU64,
}

impl Dashboard {
    pub fn new(api: ApiClient, monitor: Arc<ServerMonitor>) -> Self {
        Self {
            api,
            monitor,
            generator: InsightGenerator::new(),
            state: Mutex::new(ClientState::default()),
            submit_epoch: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ClientState {
        lock_mutex_recover(&self.state).clone()
    }

    pub fn monitor(&self) -> &Arc<ServerMonitor> {
        &self.monitor
    }

    /// Connectivity message for the banner, if the service is offline
    pub fn connection_error(&self) -> Option<String> {
        self.monitor.last_error()
    }

    /// Submit the form. Field errors are returned without touching the
    /// network; otherwise the state always ends up with a populated record,
    /// from the server when reachable and synthesized locally when not.
    pub async fn submit(&self, name: &str, location: &str) -> Result<(), FormErrors> {
        let query = Self::validate(name, location)?;
        let epoch = self.submit_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        self.dispatch(Action::SetFormData(FormData {
            name: query.name.clone(),
            location: query.location.clone(),
        }));
        self.dispatch(Action::SetError(None));
        self.dispatch(Action::SetLoading(true));

        let insight = if self.monitor.ensure_online().await {
            match self.api.business_data(&query).await {
                Ok(insight) => insight,
                Err(err) => {
                    log::warn!("business data request failed ({}), synthesizing locally", err);
                    self.synthesize(&query)
                }
            }
        } else {
            log::info!("insight service offline, synthesizing business data locally");
            self.synthesize(&query)
        };

        if self.submit_epoch.load(Ordering::SeqCst) == epoch {
            self.dispatch(Action::SetBusinessData(insight));
        } else {
            log::debug!("discarding superseded submission result");
        }
        Ok(())
    }

    /// Replace only the headline on the current record. Prefers the service
    /// when it is known online, but never depends on it succeeding.
    pub async fn regenerate_headline(&self) {
        let Some(data) = self.state().business_data else {
            log::debug!("regenerate requested with no business data");
            return;
        };
        let query = BusinessQuery {
            name: data.name,
            location: data.location,
        };
        self.dispatch(Action::SetHeadlineLoading(true));

        let headline = if self.monitor.is_online() {
            match self.api.regenerate_headline(&query).await {
                Ok(payload) => payload.headline,
                Err(err) => {
                    log::warn!("headline request failed ({}), generating locally", err);
                    self.local_headline(&query)
                }
            }
        } else {
            self.local_headline(&query)
        };

        self.dispatch(Action::UpdateHeadline(headline));
    }

    /// Clamped local edit of the rating
    pub fn set_rating(&self, rating: f64) {
        self.dispatch(Action::UpdateRating(rating));
    }

    /// Local edit of the review count
    pub fn set_reviews(&self, reviews: u32) {
        self.dispatch(Action::UpdateReviews(reviews));
    }

    pub fn set_form(&self, name: &str, location: &str) {
        self.dispatch(Action::SetFormData(FormData {
            name: name.to_string(),
            location: location.to_string(),
        }));
    }

    pub fn reset(&self) {
        self.dispatch(Action::Reset);
    }

    /// Manual retry affordance for the connectivity banner
    pub async fn retry_connection(&self) -> bool {
        self.monitor.check().await
    }

    fn dispatch(&self, action: Action) {
        let mut state = lock_mutex_recover(&self.state);
        let current = mem::take(&mut *state);
        *state = reduce(current, action);
    }

    fn validate(name: &str, location: &str) -> Result<BusinessQuery, FormErrors> {
        let name = validate_field("Business name", name);
        let location = validate_field("Location", location);
        match (name, location) {
            (Ok(name), Ok(location)) => Ok(BusinessQuery { name, location }),
            (name, location) => Err(FormErrors {
                name: name.err(),
                location: location.err(),
            }),
        }
    }

    fn synthesize(&self, query: &BusinessQuery) -> BusinessInsight {
        self.generator
            .insight(&query.name, &query.location, &mut rand::thread_rng())
    }

    fn local_headline(&self, query: &BusinessQuery) -> String {
        self.generator
            .headline(&query.name, &query.location, &mut rand::thread_rng())
    }
}
