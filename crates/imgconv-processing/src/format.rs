//! Output format dispatch.
//!
//! The requested format is modeled as a tagged variant so the quality
//! parameter only exists where it applies: `png` and `webp-nearlossless`
//! are fixed high-effort compression paths with no quality axis.

use anyhow::{anyhow, Result};
use imgconv_core::constants::DEFAULT_QUALITY;

/// A validated conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP { quality: u8 },
    WebPNearLossless,
    Jpeg { quality: u8 },
    Png,
}

impl OutputFormat {
    /// Build a format from the request's format token and raw quality value.
    ///
    /// The quality is normalized, never rejected: absent, non-integer, or
    /// out-of-range values fall back to the encoder default. Lossless paths
    /// discard it entirely.
    pub fn from_request(token: &str, raw_quality: Option<&str>) -> Result<Self> {
        match token.to_lowercase().as_str() {
            "webp" => Ok(OutputFormat::WebP {
                quality: normalize_quality(raw_quality),
            }),
            "webp-nearlossless" => Ok(OutputFormat::WebPNearLossless),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg {
                quality: normalize_quality(raw_quality),
            }),
            "png" => Ok(OutputFormat::Png),
            other => Err(anyhow!("Invalid format: {}", other)),
        }
    }

    /// The request token for this format.
    pub fn token(self) -> &'static str {
        match self {
            OutputFormat::WebP { .. } => "webp",
            OutputFormat::WebPNearLossless => "webp-nearlossless",
            OutputFormat::Jpeg { .. } => "jpeg",
            OutputFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::WebP { .. } | OutputFormat::WebPNearLossless => "image/webp",
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// Quality echoed in the manifest; `None` for the lossless paths.
    pub fn quality(self) -> Option<u8> {
        match self {
            OutputFormat::WebP { quality } | OutputFormat::Jpeg { quality } => Some(quality),
            OutputFormat::WebPNearLossless | OutputFormat::Png => None,
        }
    }
}

/// Clamp-free normalization: anything unusable becomes the default.
pub fn normalize_quality(raw: Option<&str>) -> u8 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(q) if (1..=100).contains(&q) => q as u8,
        _ => DEFAULT_QUALITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_tokens() {
        assert_eq!(
            OutputFormat::from_request("webp", Some("80")).unwrap(),
            OutputFormat::WebP { quality: 80 }
        );
        assert_eq!(
            OutputFormat::from_request("WEBP-NEARLOSSLESS", Some("80")).unwrap(),
            OutputFormat::WebPNearLossless
        );
        assert_eq!(
            OutputFormat::from_request("jpeg", None).unwrap(),
            OutputFormat::Jpeg { quality: 85 }
        );
        assert_eq!(
            OutputFormat::from_request("png", None).unwrap(),
            OutputFormat::Png
        );
        assert!(OutputFormat::from_request("bmp", None).is_err());
        assert!(OutputFormat::from_request("", None).is_err());
    }

    #[test]
    fn test_quality_normalization() {
        assert_eq!(normalize_quality(None), 85);
        assert_eq!(normalize_quality(Some("150")), 85);
        assert_eq!(normalize_quality(Some("-5")), 85);
        assert_eq!(normalize_quality(Some("0")), 85);
        assert_eq!(normalize_quality(Some("abc")), 85);
        assert_eq!(normalize_quality(Some("12.5")), 85);
        assert_eq!(normalize_quality(Some("1")), 1);
        assert_eq!(normalize_quality(Some("85")), 85);
        assert_eq!(normalize_quality(Some("100")), 100);
        assert_eq!(normalize_quality(Some(" 70 ")), 70);
    }

    #[test]
    fn test_lossless_paths_discard_quality() {
        assert_eq!(
            OutputFormat::from_request("png", Some("10")).unwrap(),
            OutputFormat::from_request("png", None).unwrap()
        );
        assert_eq!(
            OutputFormat::from_request("webp-nearlossless", Some("10")).unwrap(),
            OutputFormat::from_request("webp-nearlossless", None).unwrap()
        );
        assert_eq!(OutputFormat::Png.quality(), None);
        assert_eq!(OutputFormat::WebPNearLossless.quality(), None);
        assert_eq!(OutputFormat::Jpeg { quality: 85 }.quality(), Some(85));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(OutputFormat::WebP { quality: 80 }.mime_type(), "image/webp");
        assert_eq!(OutputFormat::WebPNearLossless.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Jpeg { quality: 80 }.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    }
}
