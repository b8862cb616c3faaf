//! Application setup and initialization.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::Result;
use imgconv_core::Config;
use std::sync::Arc;

/// Build the application: store backend, shared state, router.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let store = imgconv_store::create_store(&config)?;
    let state = Arc::new(AppState::new(config, store));
    let router = routes::build_router(state.clone())?;
    Ok((state, router))
}
