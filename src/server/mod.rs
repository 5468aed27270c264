//! HTTP server for the insight service
//!
//! A small stateless JSON API: validates `{name, location}` queries and
//! synthesizes rating/reviews/headline records from fixed pools. Holds no
//! copy of any response after sending it.

mod routes;
pub mod state;

pub use routes::AVAILABLE_ROUTES;
pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Build the service router with all routes and the CORS layer applied.
///
/// `cors_origins` of `Some(origins)` restricts CORS to that allowlist;
/// `None` is permissive (production mode behind a known deployment).
pub fn build_router(state: ServerAppState, cors_origins: Option<Vec<String>>) -> Router {
    let cors = match &cors_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(Any)
                .allow_headers([CONTENT_TYPE, ACCEPT])
        }
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE, ACCEPT]),
    };

    Router::new()
        .route("/", get(routes::index_handler))
        .route("/health", get(routes::health_handler))
        .route("/business-data", post(routes::business_data_handler))
        .route(
            "/regenerate-headline",
            get(routes::regenerate_headline_handler),
        )
        .route("/api", get(routes::api_docs_handler))
        .fallback(routes::fallback_handler)
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until shutdown is requested.
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: Option<Vec<String>>,
) -> Result<(), String> {
    let cors_display = match &cors_origins {
        Some(origins) if !origins.is_empty() => origins.join(", "),
        _ => "*".to_string(),
    };

    let app = build_router(state.clone(), cors_origins);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    println!("Local Business Dashboard API");
    println!("  Server URL:   http://{}", addr);
    println!("  Health check: http://{}/health", addr);
    println!("  API docs:     http://{}/api", addr);
    println!("  CORS origins: {}", cors_display);

    log::info!(
        "Insight service listening on http://{} ({})",
        addr,
        state.environment
    );

    // Graceful shutdown: poll the shared shutdown flag set by signal handlers
    let shutdown_state = state.shutdown_state.clone();
    let shutdown_signal = async move {
        loop {
            if shutdown_state.is_shutdown_requested() {
                log::info!("Shutdown signal received, stopping server...");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}
