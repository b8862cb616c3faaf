//! Multipart response packager.
//!
//! Serializes a manifest plus named binary parts into a
//! `multipart/form-data` body, matching what the frontend's form-data
//! parser consumes: binary part values are data-URI base64 strings and the
//! derived filename rides along as part metadata. Pure serialization; no
//! conversion logic lives here.

use base64::Engine;
use bytes::{BufMut, Bytes, BytesMut};
use rand::{distr::Alphanumeric, Rng};
use serde::Serialize;

/// One encoded image ready for packaging.
pub struct BinaryPart {
    /// Part name (`file`, `webp-q75`, `png`, ...).
    pub name: String,
    /// Derived output filename (`cat.webp`).
    pub filename: String,
    /// MIME type used in the data URI (`image/webp`).
    pub mime_type: &'static str,
    /// Encoded image bytes.
    pub data: Bytes,
}

/// A finished multipart body and the boundary token that frames it.
pub struct MultipartPackage {
    pub boundary: String,
    pub body: Bytes,
}

impl MultipartPackage {
    /// Value for the response `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Serialize a manifest and binary parts into one multipart body.
pub fn pack<M: Serialize>(manifest: &M, parts: &[BinaryPart]) -> serde_json::Result<MultipartPackage> {
    let manifest_json = serde_json::to_string(manifest)?;
    let boundary = fresh_boundary();
    let mut body = BytesMut::new();

    write_text_part(&mut body, &boundary, "manifest", &manifest_json);
    for part in parts {
        let data_uri = format!(
            "data:{};base64,{}",
            part.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&part.data)
        );
        write_file_part(&mut body, &boundary, &part.name, &part.filename, &data_uri);
    }
    write_closing(&mut body, &boundary);

    Ok(MultipartPackage {
        boundary,
        body: body.freeze(),
    })
}

/// Serialize a failure into a body with a single `error` part.
pub fn pack_error(message: &str) -> MultipartPackage {
    let boundary = fresh_boundary();
    let mut body = BytesMut::new();
    write_text_part(&mut body, &boundary, "error", message);
    write_closing(&mut body, &boundary);
    MultipartPackage {
        boundary,
        body: body.freeze(),
    }
}

// Boundary tokens are fresh per response; reuse across responses would let
// a cached body frame a later one.
fn fresh_boundary() -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("--------------------------{}", token)
}

fn write_text_part(body: &mut BytesMut, boundary: &str, name: &str, value: &str) {
    body.put_slice(format!("--{}\r\n", boundary).as_bytes());
    body.put_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
    body.put_slice(value.as_bytes());
    body.put_slice(b"\r\n");
}

fn write_file_part(body: &mut BytesMut, boundary: &str, name: &str, filename: &str, value: &str) {
    body.put_slice(format!("--{}\r\n", boundary).as_bytes());
    body.put_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
            name, filename
        )
        .as_bytes(),
    );
    body.put_slice(value.as_bytes());
    body.put_slice(b"\r\n");
}

fn write_closing(body: &mut BytesMut, boundary: &str) {
    body.put_slice(format!("--{}--\r\n", boundary).as_bytes());
}
