//! Service banner and health probe.

use axum::Json;
use serde_json::{json, Value};

/// Root banner, kept for parity with clients that probe the service name.
pub async fn root() -> &'static str {
    "imgconv-backend"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
