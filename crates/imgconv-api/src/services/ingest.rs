//! Upload ingest.
//!
//! Validates the declared type against the codec's input capabilities and
//! persists the original under a fresh opaque handle. One store write, no
//! retries; a store fault propagates to the caller as-is.

use imgconv_core::constants::ORIGINAL_TTL;
use imgconv_core::{AppError, StoredOriginal};
use imgconv_processing::ImageCodec;
use imgconv_store::EphemeralStore;
use uuid::Uuid;

use crate::error::store_error;

/// Validate and store an uploaded image; returns the handle a client uses
/// to request conversions until the TTL elapses.
pub async fn ingest(
    store: &dyn EphemeralStore,
    payload: Vec<u8>,
    declared_filename: &str,
    declared_mime_type: &str,
) -> Result<String, AppError> {
    if !ImageCodec::input_supported(declared_mime_type) {
        return Err(AppError::UnsupportedFormat(format!(
            "Cannot process file type: {}",
            declared_mime_type
        )));
    }

    let original = StoredOriginal {
        filename: base_name(declared_filename).to_string(),
        filetype: declared_mime_type.to_string(),
        payload,
    };

    let handle = Uuid::new_v4().to_string();
    store
        .put(&handle, &original, ORIGINAL_TTL)
        .await
        .map_err(store_error)?;

    tracing::info!(
        handle = %handle,
        filename = %original.filename,
        filetype = %original.filetype,
        size = original.payload.len(),
        "Original ingested"
    );

    Ok(handle)
}

/// Extension-stripped base name; an empty name falls back to `file`.
fn base_name(filename: &str) -> &str {
    match filename.split('.').next() {
        Some("") | None => "file",
        Some(base) => base,
    }
}
