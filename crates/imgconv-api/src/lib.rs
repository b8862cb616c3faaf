//! Imgconv API Library
//!
//! HTTP surface of the conversion service: handlers, the ingest and
//! conversion services, the multipart response packager, and application
//! setup.

mod api_doc;
mod handlers;

// Public modules
pub mod error;
pub mod multipart;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::HttpAppError;
pub use state::AppState;
