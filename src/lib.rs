// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::needless_borrow)] // Explicit borrows can clarify ownership

// Module declarations
pub mod client;
pub mod generator;
pub mod models;
pub mod shutdown;
mod utils;

// Server module (HTTP API)
pub mod server;

// Re-export the core contracts
pub use models::{BusinessInsight, BusinessQuery};
