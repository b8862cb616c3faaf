//! Conversion handlers.
//!
//! Both endpoints answer with a multipart body: a `manifest` JSON part plus
//! binary part(s) whose values are data-URI base64 strings. Failures become
//! a single `error` part via `HttpAppError`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use imgconv_core::AppError;

use crate::error::{multipart_response, HttpAppError};
use crate::multipart::{self, BinaryPart};
use crate::services::convert;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Raw quality value; normalized, never rejected.
    quality: Option<String>,
}

#[utoipa::path(
    get,
    path = "/images/{handle}/{format}",
    tag = "images",
    params(
        ("handle" = String, Path, description = "Handle returned by the upload endpoint"),
        ("format" = String, Path, description = "One of webp, webp-nearlossless, jpeg, png"),
        ("quality" = Option<String>, Query, description = "Quality 1-100; out-of-range or non-numeric values fall back to the default")
    ),
    responses(
        (status = 200, description = "Multipart body with manifest and encoded image", content_type = "multipart/form-data"),
        (status = 404, description = "Handle unknown or expired", content_type = "multipart/form-data")
    )
)]
#[tracing::instrument(skip(state), fields(operation = "convert_image"))]
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    Path((handle, format)): Path<(String, String)>,
    Query(query): Query<ConvertQuery>,
) -> Result<Response, HttpAppError> {
    let variant = convert::convert(
        state.store.as_ref(),
        &handle,
        &format,
        query.quality.as_deref(),
    )
    .await?;

    let parts = [BinaryPart {
        name: "file".to_string(),
        filename: variant.info.filename.clone(),
        mime_type: variant.format.mime_type(),
        data: variant.data,
    }];
    let package = multipart::pack(&variant.info, &parts)
        .map_err(|e| AppError::Internal(format!("Failed to serialize manifest: {}", e)))?;

    Ok(multipart_response(StatusCode::OK, package))
}

#[utoipa::path(
    get,
    path = "/images/{handle}",
    tag = "images",
    params(
        ("handle" = String, Path, description = "Handle returned by the upload endpoint")
    ),
    responses(
        (status = 200, description = "Multipart body with the full variant battery", content_type = "multipart/form-data"),
        (status = 404, description = "Handle unknown or expired", content_type = "multipart/form-data")
    )
)]
#[tracing::instrument(skip(state), fields(operation = "convert_image_battery"))]
pub async fn convert_image_battery(
    State(state): State<Arc<AppState>>,
    Path(handle): Path<String>,
) -> Result<Response, HttpAppError> {
    let (manifest, variants) = convert::convert_battery(state.store.as_ref(), &handle).await?;

    let parts: Vec<BinaryPart> = variants
        .into_iter()
        .map(|variant| BinaryPart {
            name: variant.key,
            filename: variant.info.filename,
            mime_type: variant.mime_type,
            data: variant.data,
        })
        .collect();
    let package = multipart::pack(&manifest, &parts)
        .map_err(|e| AppError::Internal(format!("Failed to serialize manifest: {}", e)))?;

    Ok(multipart_response(StatusCode::OK, package))
}
