//! Upload image handler
//!
//! Accepts a multipart form with one file field, validates the declared
//! type, and stores the original under a fresh handle. The response body is
//! JSON either way: `{success: true, handler}` or `{success: false, error}`
//! - the contract the existing frontend consumes, with validation failures
//! answered as HTTP 200.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};

use imgconv_core::ErrorMetadata;

use crate::services::ingest;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/images",
    tag = "images",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Handle for the stored original, or a structured error")
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Json<Value> {
    match read_file_field(multipart).await {
        Ok((payload, filename, mime_type)) => {
            match ingest::ingest(state.store.as_ref(), payload, &filename, &mime_type).await {
                Ok(handle) => Json(json!({ "success": true, "handler": handle })),
                Err(e) => {
                    tracing::debug!(error = %e, code = e.error_code(), "Upload rejected");
                    Json(json!({ "success": false, "error": e.client_message() }))
                }
            }
        }
        Err(message) => {
            tracing::debug!(error = %message, "Malformed upload request");
            Json(json!({ "success": false, "error": message }))
        }
    }
}

/// Pull the first file field out of the multipart request.
async fn read_file_field(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, String, String), String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid multipart request: {}", e))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let filename = field.file_name().unwrap_or("file").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let payload = field
            .bytes()
            .await
            .map_err(|e| format!("Failed to read upload: {}", e))?;
        return Ok((payload.to_vec(), filename, mime_type));
    }
    Err("No file field in upload".to_string())
}
