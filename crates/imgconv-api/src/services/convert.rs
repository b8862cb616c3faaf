//! Conversion orchestration.
//!
//! Retrieves a stored original by handle, re-encodes it, and derives the
//! result metadata from the actual encoded bytes. Reads never mutate the
//! store; the same handle stays convertible until its TTL elapses. Any
//! codec failure aborts the whole conversion; no partial manifest leaves
//! this module.

use bytes::Bytes;
use imgconv_core::constants::BATTERY_QUALITIES;
use imgconv_core::{AppError, BatteryManifest, InputInfo, VariantInfo};
use imgconv_processing::{ImageCodec, OutputFormat};
use imgconv_store::EphemeralStore;
use std::collections::BTreeMap;

use crate::error::store_error;

/// A single converted variant with its manifest entry.
#[derive(Debug)]
pub struct ConvertedVariant {
    pub info: VariantInfo,
    pub format: OutputFormat,
    pub data: Bytes,
}

/// A battery variant, keyed for its multipart part name (`webp-q75`).
#[derive(Debug)]
pub struct NamedVariant {
    pub key: String,
    pub info: VariantInfo,
    pub mime_type: &'static str,
    pub data: Bytes,
}

/// Convert the stored original behind `handle` to one requested variant.
pub async fn convert(
    store: &dyn EphemeralStore,
    handle: &str,
    format_token: &str,
    raw_quality: Option<&str>,
) -> Result<ConvertedVariant, AppError> {
    let original = store.get(handle).await.map_err(store_error)?;

    let format = OutputFormat::from_request(format_token, raw_quality).map_err(|_| {
        AppError::UnsupportedFormat(format!("Requested format not supported: {}", format_token))
    })?;

    let payload = original.payload;
    let encoded = tokio::task::spawn_blocking(move || ImageCodec::encode(&payload, format))
        .await
        .map_err(|e| AppError::Internal(format!("Encoding task failed: {}", e)))?
        .map_err(encoding_failed)?;

    let variant = describe(&original.filename, format, &encoded)?;

    tracing::info!(
        handle = %handle,
        format = format.token(),
        quality = ?format.quality(),
        filesize = variant.filesize,
        "Conversion produced"
    );

    Ok(ConvertedVariant {
        info: variant,
        format,
        data: encoded,
    })
}

/// Convert the stored original to the fixed battery: lossy WebP and JPEG at
/// each battery quality, plus one PNG.
pub async fn convert_battery(
    store: &dyn EphemeralStore,
    handle: &str,
) -> Result<(BatteryManifest, Vec<NamedVariant>), AppError> {
    let original = store.get(handle).await.map_err(store_error)?;

    let base_name = original.filename.clone();
    let result = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let input_probe = ImageCodec::probe(&original.payload)?;
        let inputfile = InputInfo {
            filename: original.filename.clone(),
            filetype: input_probe.format.to_string(),
            filesize: input_probe.size,
        };

        let mut variants = Vec::new();
        for &quality in &BATTERY_QUALITIES {
            variants.push((
                format!("webp-q{}", quality),
                OutputFormat::WebP { quality },
                ImageCodec::encode(&original.payload, OutputFormat::WebP { quality })?,
            ));
        }
        for &quality in &BATTERY_QUALITIES {
            variants.push((
                format!("jpeg-q{}", quality),
                OutputFormat::Jpeg { quality },
                ImageCodec::encode(&original.payload, OutputFormat::Jpeg { quality })?,
            ));
        }
        variants.push((
            "png".to_string(),
            OutputFormat::Png,
            ImageCodec::encode(&original.payload, OutputFormat::Png)?,
        ));

        Ok((inputfile, variants))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Encoding task failed: {}", e)))?;

    let (inputfile, raw_variants) = result.map_err(encoding_failed)?;

    let mut webps = BTreeMap::new();
    let mut jpegs = BTreeMap::new();
    let mut png = None;
    let mut named = Vec::with_capacity(raw_variants.len());

    for (key, format, data) in raw_variants {
        let info = describe_battery(&base_name, format, &data)?;
        match format {
            OutputFormat::WebP { .. } => {
                webps.insert(key.clone(), info.clone());
            }
            OutputFormat::Jpeg { .. } => {
                jpegs.insert(key.clone(), info.clone());
            }
            OutputFormat::Png => {
                png = Some(info.clone());
            }
            OutputFormat::WebPNearLossless => unreachable!("not part of the battery"),
        }
        named.push(NamedVariant {
            key,
            info,
            mime_type: format.mime_type(),
            data,
        });
    }

    let png = png.ok_or_else(|| AppError::Internal("battery produced no PNG".to_string()))?;

    tracing::info!(
        handle = %handle,
        variants = named.len(),
        "Battery conversion produced"
    );

    Ok((
        BatteryManifest {
            inputfile,
            webps,
            jpegs,
            png,
        },
        named,
    ))
}

/// Manifest entry for one encoded output. Filename extension comes from the
/// encoded bytes, not from the request.
fn describe(base_name: &str, format: OutputFormat, encoded: &Bytes) -> Result<VariantInfo, AppError> {
    let probe = ImageCodec::probe(encoded).map_err(encoding_failed)?;
    Ok(VariantInfo {
        filename: format!("{}.{}", base_name, probe.extension),
        filesize: probe.size,
        quality: format.quality(),
    })
}

/// Battery filenames carry the quality axis: `cat-q75.webp`, `cat.png`.
fn describe_battery(
    base_name: &str,
    format: OutputFormat,
    encoded: &Bytes,
) -> Result<VariantInfo, AppError> {
    let probe = ImageCodec::probe(encoded).map_err(encoding_failed)?;
    let filename = match format.quality() {
        Some(quality) => format!("{}-q{}.{}", base_name, quality, probe.extension),
        None => format!("{}.{}", base_name, probe.extension),
    };
    Ok(VariantInfo {
        filename,
        filesize: probe.size,
        quality: format.quality(),
    })
}

fn encoding_failed(source: anyhow::Error) -> AppError {
    AppError::EncodingFailed {
        message: source.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgconv_core::constants::ORIGINAL_TTL;
    use imgconv_core::StoredOriginal;
    use imgconv_store::MemoryStore;
    use std::time::Duration;

    fn png_original(width: u32, height: u32) -> StoredOriginal {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_fn(
            width,
            height,
            |x, y| {
                if (x + y) % 2 == 0 {
                    image::Rgba([255, 0, 0, 255])
                } else {
                    image::Rgba([0, 255, 0, 255])
                }
            },
        ));
        let mut payload = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut payload),
            image::ImageFormat::Png,
        )
        .unwrap();
        StoredOriginal {
            filename: "cat".into(),
            filetype: "image/png".into(),
            payload,
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put("h1", &png_original(100, 100), ORIGINAL_TTL)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_convert_webp_end_to_end() {
        let store = seeded_store().await;
        let variant = convert(&store, "h1", "webp", Some("80")).await.unwrap();
        assert_eq!(variant.info.filename, "cat.webp");
        assert_eq!(variant.info.quality, Some(80));
        assert_eq!(variant.info.filesize, variant.data.len() as u64);

        let decoded = image::load_from_memory(&variant.data).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&decoded), (100, 100));
        assert_eq!(
            image::guess_format(&variant.data).unwrap(),
            image::ImageFormat::WebP
        );
    }

    #[tokio::test]
    async fn test_convert_is_idempotent() {
        let store = seeded_store().await;
        let first = convert(&store, "h1", "webp", Some("75")).await.unwrap();
        let second = convert(&store, "h1", "webp", Some("75")).await.unwrap();
        assert_eq!(first.data, second.data);
        assert_eq!(first.info, second.info);
    }

    #[tokio::test]
    async fn test_quality_normalization_applies() {
        let store = seeded_store().await;
        for raw in ["150", "-5", "abc"] {
            let variant = convert(&store, "h1", "jpeg", Some(raw)).await.unwrap();
            assert_eq!(variant.info.quality, Some(85), "raw quality {:?}", raw);
        }
        let variant = convert(&store, "h1", "jpeg", Some("85")).await.unwrap();
        assert_eq!(variant.info.quality, Some(85));
    }

    #[tokio::test]
    async fn test_png_ignores_quality() {
        let store = seeded_store().await;
        let with_quality = convert(&store, "h1", "png", Some("10")).await.unwrap();
        let without = convert(&store, "h1", "png", None).await.unwrap();
        assert_eq!(with_quality.data, without.data);
        assert_eq!(with_quality.info.quality, None);
        assert_eq!(with_quality.info.filename, "cat.png");
    }

    #[tokio::test]
    async fn test_unknown_format_is_unsupported() {
        let store = seeded_store().await;
        let err = convert(&store, "h1", "bmp", None).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_expired_handle_is_not_found() {
        let store = MemoryStore::new();
        store
            .put("h1", &png_original(10, 10), Duration::ZERO)
            .await
            .unwrap();
        let err = convert(&store, "h1", "webp", None).await.unwrap_err();
        assert!(matches!(err, AppError::HandleNotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupt_payload_fails_encoding() {
        let store = MemoryStore::new();
        let corrupt = StoredOriginal {
            filename: "cat".into(),
            filetype: "image/png".into(),
            payload: vec![0u8; 128],
        };
        store.put("h1", &corrupt, ORIGINAL_TTL).await.unwrap();
        let err = convert(&store, "h1", "webp", None).await.unwrap_err();
        assert!(matches!(err, AppError::EncodingFailed { .. }));
    }

    #[tokio::test]
    async fn test_battery_shape() {
        let store = seeded_store().await;
        let (manifest, variants) = convert_battery(&store, "h1").await.unwrap();

        assert_eq!(manifest.inputfile.filename, "cat");
        assert_eq!(manifest.inputfile.filetype, "png");
        assert_eq!(manifest.webps.len(), 4);
        assert_eq!(manifest.jpegs.len(), 4);
        assert_eq!(manifest.webps["webp-q75"].quality, Some(75));
        assert_eq!(manifest.webps["webp-q75"].filename, "cat-q75.webp");
        assert_eq!(manifest.jpegs["jpeg-q85"].filename, "cat-q85.jpeg");
        assert_eq!(manifest.png.quality, None);
        assert_eq!(manifest.png.filename, "cat.png");

        assert_eq!(variants.len(), 9);
        for variant in &variants {
            assert_eq!(variant.info.filesize, variant.data.len() as u64);
        }
    }

    #[tokio::test]
    async fn test_battery_expired_handle() {
        let store = MemoryStore::new();
        let err = convert_battery(&store, "gone").await.unwrap_err();
        assert!(matches!(err, AppError::HandleNotFound(_)));
    }
}
