//! Application state.
//!
//! The ephemeral store is an explicit injected value, not a process-global:
//! handlers and services receive it through `AppState`, so tests can swap
//! in the in-memory backend without touching configuration.

use imgconv_core::Config;
use imgconv_store::EphemeralStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn EphemeralStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn EphemeralStore>) -> Self {
        AppState { config, store }
    }
}
