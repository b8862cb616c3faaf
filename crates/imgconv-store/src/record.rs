//! Persisted record layout.

use base64::Engine;
use imgconv_core::StoredOriginal;
use serde::{Deserialize, Serialize};

use crate::traits::StoreError;

/// Wire form of a stored original: `buffer` is base64 so the record is a
/// plain JSON string value in any backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredRecord {
    pub filename: String,
    pub filetype: String,
    pub buffer: String,
}

impl StoredRecord {
    pub fn from_original(original: &StoredOriginal) -> Self {
        StoredRecord {
            filename: original.filename.clone(),
            filetype: original.filetype.clone(),
            buffer: base64::engine::general_purpose::STANDARD.encode(&original.payload),
        }
    }

    pub fn into_original(self, handle: &str) -> Result<StoredOriginal, StoreError> {
        let payload = base64::engine::general_purpose::STANDARD
            .decode(&self.buffer)
            .map_err(|e| StoreError::Corrupt {
                handle: handle.to_string(),
                message: format!("invalid base64 payload: {}", e),
            })?;
        Ok(StoredOriginal {
            filename: self.filename,
            filetype: self.filetype,
            payload,
        })
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    pub fn from_json(handle: &str, raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
            handle: handle.to_string(),
            message: e.to_string(),
        })
    }
}
