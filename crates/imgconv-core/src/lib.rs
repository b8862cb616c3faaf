//! Imgconv Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! constants shared across all imgconv components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, StoreBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{BatteryManifest, InputInfo, StoredOriginal, VariantInfo};
