//! Router construction: endpoints plus the ambient HTTP layers.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::handlers;
use crate::state::AppState;
use imgconv_core::Config;

pub fn build_router(state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(&state.config)?;

    let router = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route(
            "/api/openapi.json",
            get(|| async { Json(api_doc::get_openapi_spec()) }),
        )
        .route("/images", post(handlers::upload::upload_image))
        .route(
            "/images/{handle}",
            get(handlers::convert::convert_image_battery),
        )
        .route(
            "/images/{handle}/{format}",
            get(handlers::convert::convert_image),
        )
        .layer(ConcurrencyLimitLayer::new(
            state.config.http_concurrency_limit(),
        ))
        .layer(DefaultBodyLimit::max(state.config.max_upload_size_bytes()))
        .layer(RequestBodyLimitLayer::new(
            state.config.max_upload_size_bytes(),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// CORS from configuration; `*` opens up all origins, anything else is an
/// explicit allowlist.
fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins in production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", origin, e))
            })
            .collect::<Result<Vec<_>>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
