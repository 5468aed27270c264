//! Route handlers for the insight service
//!
//! Validation failures return 400 with a machine-readable `error` field;
//! anything unexpected is converted into a generic 500 body, never a stack
//! trace and never a process crash.

use super::state::ServerAppState;
use crate::models::{validate_field, FieldError};
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

/// Route list advertised by the index, docs, and 404 responses
pub const AVAILABLE_ROUTES: [&str; 5] = [
    "GET /",
    "POST /business-data",
    "GET /regenerate-headline",
    "GET /health",
    "GET /api",
];

/// JSON failure response
pub struct ApiFailure {
    status: StatusCode,
    body: Value,
}

impl ApiFailure {
    fn bad_request(error: &str, details: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": error, "details": details }),
        }
    }

    /// Attach the per-field presence map used by the missing-fields response
    fn received(mut self, name: bool, location: bool) -> Self {
        self.body["received"] = json!({ "name": name, "location": location });
        self
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Top-level conversion policy: any unexpected error becomes a generic 500.
impl From<anyhow::Error> for ApiFailure {
    fn from(err: anyhow::Error) -> Self {
        let request_id = uuid::Uuid::new_v4();
        log::error!("unexpected server error [{}]: {:#}", request_id, err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({
                "error": "Internal Server Error",
                "message": "Something went wrong on the server",
                "timestamp": Utc::now().to_rfc3339(),
                "requestId": request_id.to_string(),
            }),
        }
    }
}

fn reject_field(err: FieldError) -> ApiFailure {
    log::info!("request rejected: {}", err);
    match err {
        FieldError::Required(_) => ApiFailure::bad_request(
            "Empty fields not allowed",
            "Name and location cannot be empty",
        ),
        FieldError::TooLong(_) => ApiFailure::bad_request("Field too long", &err.to_string()),
    }
}

/// Root route: service metadata and route list
pub async fn index_handler(State(state): State<ServerAppState>) -> Json<Value> {
    log::debug!("root route accessed");
    Json(json!({
        "message": "Local Business Dashboard API is running successfully",
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment,
        "availableRoutes": AVAILABLE_ROUTES,
    }))
}

/// Liveness probe. Never used for business logic.
pub async fn health_handler(State(state): State<ServerAppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment,
    }))
}

/// POST /business-data: validate the query, then synthesize an insight
/// record from the fixed candidate pools.
pub async fn business_data_handler(
    State(state): State<ServerAppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiFailure> {
    log::debug!("business data request: {}", body);

    let name = body.get("name").filter(|v| !v.is_null());
    let location = body.get("location").filter(|v| !v.is_null());

    let (name, location) = match (name, location) {
        (Some(name), Some(location)) => (name, location),
        (name, location) => {
            log::info!("business data rejected: missing fields");
            return Err(ApiFailure::bad_request(
                "Missing required fields",
                "Both name and location are required",
            )
            .received(name.is_some(), location.is_some()));
        }
    };

    let (Some(name), Some(location)) = (name.as_str(), location.as_str()) else {
        log::info!("business data rejected: invalid field types");
        return Err(ApiFailure::bad_request(
            "Invalid field types",
            "Name and location must be strings",
        ));
    };

    let name = validate_field("name", name).map_err(reject_field)?;
    let location = validate_field("location", location).map_err(reject_field)?;

    let insight = state
        .generator
        .insight(&name, &location, &mut rand::thread_rng());

    let mut payload = serde_json::to_value(&insight).map_err(anyhow::Error::from)?;
    payload["success"] = Value::Bool(true);

    log::info!(
        "business data generated for '{}' in '{}' (rating {}, {} reviews)",
        insight.name,
        insight.location,
        insight.rating,
        insight.reviews
    );
    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
pub struct HeadlineParams {
    name: Option<String>,
    location: Option<String>,
}

/// GET /regenerate-headline: same validation, fresh headline only
pub async fn regenerate_headline_handler(
    State(state): State<ServerAppState>,
    Query(params): Query<HeadlineParams>,
) -> Result<Json<Value>, ApiFailure> {
    let (Some(name), Some(location)) = (params.name, params.location) else {
        log::info!("headline request rejected: missing query parameters");
        return Err(ApiFailure::bad_request(
            "Missing required query parameters",
            "Both name and location are required",
        ));
    };

    let name = validate_field("name", &name).map_err(reject_field)?;
    let location = validate_field("location", &location).map_err(reject_field)?;

    let headline = state
        .generator
        .headline(&name, &location, &mut rand::thread_rng());

    log::info!("headline regenerated for '{}' in '{}'", name, location);
    Ok(Json(json!({
        "headline": headline,
        "timestamp": Utc::now().to_rfc3339(),
        "success": true,
    })))
}

/// GET /api: machine-readable endpoint documentation
pub async fn api_docs_handler(State(state): State<ServerAppState>) -> Json<Value> {
    Json(json!({
        "documentation": {
            "title": "Local Business Dashboard API",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.environment,
            "endpoints": [
                {
                    "method": "GET",
                    "path": "/",
                    "description": "API information and status"
                },
                {
                    "method": "GET",
                    "path": "/health",
                    "description": "Health check endpoint for monitoring"
                },
                {
                    "method": "POST",
                    "path": "/business-data",
                    "description": "Get business analytics data",
                    "body": {
                        "name": "string (required) - Business name",
                        "location": "string (required) - Business location"
                    },
                    "response": {
                        "rating": "number - Business rating",
                        "reviews": "number - Number of reviews",
                        "headline": "string - Generated SEO headline",
                        "name": "string - Business name",
                        "location": "string - Business location",
                        "timestamp": "string - Response timestamp",
                        "success": "boolean - Request success status"
                    }
                },
                {
                    "method": "GET",
                    "path": "/regenerate-headline",
                    "description": "Generate a new SEO headline",
                    "query": {
                        "name": "string (required) - Business name",
                        "location": "string (required) - Business location"
                    },
                    "response": {
                        "headline": "string - New SEO headline",
                        "timestamp": "string - Response timestamp",
                        "success": "boolean - Request success status"
                    }
                }
            ]
        }
    }))
}

/// Fallback for unmatched routes
pub async fn fallback_handler(uri: Uri) -> ApiFailure {
    log::info!("404 - route not found: {}", uri.path());
    ApiFailure {
        status: StatusCode::NOT_FOUND,
        body: json!({
            "error": "Route not found",
            "message": format!("The requested route {} does not exist", uri.path()),
            "availableRoutes": AVAILABLE_ROUTES,
            "timestamp": Utc::now().to_rfc3339(),
        }),
    }
}
