//! Server application state shared across handlers

use crate::generator::InsightGenerator;
use crate::shutdown::ShutdownState;
use std::time::Instant;

/// Shared state for the insight service. The service itself is stateless
/// per request; this only carries process-level facts (start time,
/// environment label) and the shutdown flag.
#[derive(Clone)]
pub struct ServerAppState {
    /// Insight synthesizer shared by the data and headline routes
    pub generator: InsightGenerator,

    /// Deployment environment label ("development" or "production")
    pub environment: String,

    /// Process start time, reported as uptime by /health
    pub started_at: Instant,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    pub fn new(environment: String) -> Self {
        Self {
            generator: InsightGenerator::new(),
            environment,
            started_at: Instant::now(),
            shutdown_state: ShutdownState::new(),
        }
    }
}
