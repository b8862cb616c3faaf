//! Domain models shared between the store, the orchestrator, and the API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An uploaded image awaiting conversion.
///
/// Lives in the ephemeral store between ingest and TTL expiry. Never
/// mutated: conversions read it, the store's own expiry deletes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredOriginal {
    /// Extension-stripped base name of the uploaded file.
    pub filename: String,
    /// Declared MIME type, as provided by the uploader.
    pub filetype: String,
    /// Raw encoded bytes of the original image.
    pub payload: Vec<u8>,
}

/// Manifest entry describing one conversion output.
///
/// `quality` is omitted from the serialized form for lossless paths.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantInfo {
    pub filename: String,
    pub filesize: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

/// Metadata of the uploaded original, echoed in the batch manifest.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputInfo {
    pub filename: String,
    pub filetype: String,
    pub filesize: u64,
}

/// Manifest for the fixed battery of variants produced by batch conversion.
///
/// Keys are composite part names (`webp-q75`, `jpeg-q85`); the PNG has no
/// quality axis and gets a single entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatteryManifest {
    pub inputfile: InputInfo,
    pub webps: BTreeMap<String, VariantInfo>,
    pub jpegs: BTreeMap<String, VariantInfo>,
    pub png: VariantInfo,
}
