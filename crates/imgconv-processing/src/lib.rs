//! Imgconv Processing Library
//!
//! This crate is the codec boundary of the service: output-format dispatch,
//! the actual encoders (PNG, lossy/near-lossless WebP, mozjpeg JPEG), and
//! probing of encoded bytes for format and size.

pub mod codec;
pub mod format;

// Re-export commonly used types
pub use codec::{EncodedInfo, ImageCodec};
pub use format::OutputFormat;
