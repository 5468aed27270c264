//! Dashboard client: service access, resiliency, state container, and
//! presentational derivations
//!
//! The client never propagates a raw network error to a view. Every failure
//! becomes a field-level validation error, a connectivity message with a
//! manual retry, or a silent fallback to locally synthesized data.

pub mod api;
pub mod dashboard;
pub mod monitor;
pub mod report;
pub mod store;

pub use api::{ApiClient, ApiError, HeadlinePayload, DEFAULT_BASE_URL};
pub use dashboard::{Dashboard, FormErrors};
pub use monitor::{HealthProbe, MonitorConfig, ServerMonitor, ServerStatus};
pub use store::{reduce, Action, ClientState, FormData};
