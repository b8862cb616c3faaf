//! Image codec: decode, re-encode, probe.
//!
//! All pixel-level work happens here. Callers treat this as a capability:
//! `input_supported` answers whether a declared MIME type is decodable,
//! `encode` produces the requested variant, `probe` reports format and size
//! of encoded bytes. Encoding is CPU-bound and synchronous; async callers
//! run it under `spawn_blocking`.

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::format::OutputFormat;

/// Metadata of encoded bytes, derived from the bytes themselves rather than
/// from the request that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedInfo {
    /// Canonical format token (`png`, `jpeg`, `webp`, ...).
    pub format: &'static str,
    /// Canonical filename extension for that format.
    pub extension: &'static str,
    /// Byte length of the encoded payload.
    pub size: u64,
}

pub struct ImageCodec;

impl ImageCodec {
    /// Whether the declared MIME type names a format this codec can decode.
    pub fn input_supported(mime_type: &str) -> bool {
        ImageFormat::from_mime_type(mime_type)
            .map(|format| format.reading_enabled())
            .unwrap_or(false)
    }

    /// Decode the source bytes and re-encode them as `format`.
    ///
    /// Fails atomically: any decode or encode error aborts the whole call.
    pub fn encode(data: &[u8], format: OutputFormat) -> Result<Bytes> {
        let img = image::load_from_memory(data).context("Failed to decode source image")?;

        let encoded = match format {
            OutputFormat::Jpeg { quality } => Self::encode_jpeg(&img, quality),
            OutputFormat::Png => Self::encode_png(&img),
            OutputFormat::WebP { quality } => Self::encode_webp(&img, quality),
            OutputFormat::WebPNearLossless => Self::encode_webp_near_lossless(&img),
        }?;

        tracing::debug!(
            format = format.token(),
            input_bytes = data.len(),
            output_bytes = encoded.len(),
            "Image encoded"
        );

        Ok(encoded)
    }

    /// Report format token, canonical extension, and size of encoded bytes.
    pub fn probe(data: &[u8]) -> Result<EncodedInfo> {
        let format = image::guess_format(data).context("Unrecognized image data")?;
        let (token, extension) = canonical_names(format);
        Ok(EncodedInfo {
            format: token,
            extension,
            size: data.len() as u64,
        })
    }

    /// Encode to JPEG using mozjpeg: progressive scan structure and
    /// optimized Huffman coding at the given quality.
    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .context("Failed to start JPEG compression")?;
        comp.write_scanlines(&rgb_img)
            .context("Failed to write JPEG scanlines")?;
        let jpeg_data = comp.finish().context("Failed to finish JPEG compression")?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Encode to PNG with adaptive filtering and the highest compression
    /// effort. No quality axis.
    fn encode_png(img: &DynamicImage) -> Result<Bytes> {
        let mut buffer = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
        img.write_with_encoder(encoder)
            .context("Failed to encode PNG")?;

        Ok(Bytes::from(buffer))
    }

    /// Encode to lossy WebP at the given quality.
    fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    /// Encode to near-lossless WebP: the lossless pipeline with pixel
    /// preprocessing, no quality parameter.
    fn encode_webp_near_lossless(img: &DynamicImage) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let mut config =
            webp::WebPConfig::new().map_err(|_| anyhow!("Failed to initialize WebP config"))?;
        config.lossless = 1;
        config.near_lossless = 60;
        config.quality = 75.0;

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder
            .encode_advanced(&config)
            .map_err(|e| anyhow!("WebP near-lossless encoding failed: {:?}", e))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}

/// Canonical (token, extension) pair for a detected format. The extension
/// follows the format name, not the request, so an encoder substituting a
/// different container would surface in the derived filename.
fn canonical_names(format: ImageFormat) -> (&'static str, &'static str) {
    match format {
        ImageFormat::Png => ("png", "png"),
        ImageFormat::Jpeg => ("jpeg", "jpeg"),
        ImageFormat::WebP => ("webp", "webp"),
        ImageFormat::Gif => ("gif", "gif"),
        ImageFormat::Tiff => ("tiff", "tiff"),
        other => {
            let ext = other.extensions_str().first().copied().unwrap_or("bin");
            (ext, ext)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let color = if (x + y) % 16 < 8 {
                    Rgba([200, 30, 30, 255])
                } else {
                    Rgba([30, 30, 200, 255])
                };
                img.put_pixel(x, y, color);
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        test_image(width, height)
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_input_supported() {
        assert!(ImageCodec::input_supported("image/png"));
        assert!(ImageCodec::input_supported("image/jpeg"));
        assert!(ImageCodec::input_supported("image/webp"));
        assert!(ImageCodec::input_supported("image/gif"));
        assert!(ImageCodec::input_supported("image/tiff"));
        assert!(!ImageCodec::input_supported("application/pdf"));
        assert!(!ImageCodec::input_supported("text/plain"));
        assert!(!ImageCodec::input_supported("png"));
    }

    #[test]
    fn test_encode_every_format_preserves_dimensions() {
        let source = png_bytes(100, 100);
        let formats = [
            OutputFormat::WebP { quality: 80 },
            OutputFormat::WebPNearLossless,
            OutputFormat::Jpeg { quality: 85 },
            OutputFormat::Png,
        ];
        for format in formats {
            let encoded = ImageCodec::encode(&source, format).unwrap();
            assert!(!encoded.is_empty());
            let decoded = image::load_from_memory(&encoded).unwrap();
            assert_eq!(decoded.dimensions(), (100, 100), "{}", format.token());
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let source = png_bytes(64, 48);
        let a = ImageCodec::encode(&source, OutputFormat::WebP { quality: 80 }).unwrap();
        let b = ImageCodec::encode(&source, OutputFormat::WebP { quality: 80 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_probe_reports_actual_output_format() {
        let source = png_bytes(32, 32);

        let webp = ImageCodec::encode(&source, OutputFormat::WebP { quality: 70 }).unwrap();
        let info = ImageCodec::probe(&webp).unwrap();
        assert_eq!(info.format, "webp");
        assert_eq!(info.extension, "webp");
        assert_eq!(info.size, webp.len() as u64);

        let jpeg = ImageCodec::encode(&source, OutputFormat::Jpeg { quality: 85 }).unwrap();
        let info = ImageCodec::probe(&jpeg).unwrap();
        assert_eq!(info.format, "jpeg");
        assert_eq!(info.extension, "jpeg");

        let png = ImageCodec::encode(&source, OutputFormat::Png).unwrap();
        let info = ImageCodec::probe(&png).unwrap();
        assert_eq!(info.format, "png");
    }

    #[test]
    fn test_near_lossless_output_is_webp() {
        let source = png_bytes(40, 40);
        let encoded = ImageCodec::encode(&source, OutputFormat::WebPNearLossless).unwrap();
        let info = ImageCodec::probe(&encoded).unwrap();
        assert_eq!(info.format, "webp");
    }

    #[test]
    fn test_encode_rejects_garbage() {
        let garbage = vec![0u8; 256];
        assert!(ImageCodec::encode(&garbage, OutputFormat::Png).is_err());
        assert!(ImageCodec::probe(&garbage).is_err());
    }

    #[test]
    fn test_jpeg_quality_affects_size() {
        let source = png_bytes(120, 120);
        let low = ImageCodec::encode(&source, OutputFormat::Jpeg { quality: 10 }).unwrap();
        let high = ImageCodec::encode(&source, OutputFormat::Jpeg { quality: 95 }).unwrap();
        assert!(low.len() < high.len());
    }
}
