// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image transcoder — re-encode one decoded image into a target raster
// format at a given quality. Operates on in-memory images using the `image`
// crate, with the `webp` crate for lossy WebP output.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use tracing::{debug, instrument, warn};

use wandelwerk_core::error::{ConvertError, Result};
use wandelwerk_core::options::{MAX_QUALITY, MIN_QUALITY};
use wandelwerk_core::sniff;
use wandelwerk_core::types::RasterFormat;

/// Outcome of a transcode request.
///
/// SVG output is not vector tracing. When `svg` is requested the engine
/// rasterises to PNG and reports that through the `RasterFallback` variant,
/// so callers cannot mistake the bytes for true vector output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcoded {
    /// Bytes in the requested format.
    Native(Vec<u8>),
    /// PNG bytes standing in for a format the engine cannot produce.
    RasterFallback(Vec<u8>),
}

impl Transcoded {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Native(bytes) | Self::RasterFallback(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Native(bytes) | Self::RasterFallback(bytes) => bytes,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::RasterFallback(_))
    }
}

/// Re-encode one image into `format`.
///
/// `quality` is clamped to [30, 100] and applies to the lossy encoders
/// only; PNG always encodes at maximum compression. Deterministic for
/// identical input bytes and options.
#[instrument(skip(bytes), fields(bytes_len = bytes.len(), ?format, quality))]
pub fn transcode(bytes: &[u8], format: RasterFormat, quality: u8) -> Result<Transcoded> {
    let img = decode(bytes)?;
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);

    debug!(
        width = img.width(),
        height = img.height(),
        "input decoded"
    );

    match format {
        RasterFormat::Png => Ok(Transcoded::Native(encode_png(&img)?)),
        RasterFormat::Jpeg => Ok(Transcoded::Native(encode_jpeg(&img, quality)?)),
        RasterFormat::WebP => Ok(Transcoded::Native(encode_webp(&img, quality))),
        RasterFormat::Svg => {
            // Vector tracing is out of scope; rasterise and say so.
            warn!("svg requested — producing a PNG raster fallback");
            Ok(Transcoded::RasterFallback(encode_png(&img)?))
        }
    }
}

/// Decode an encoded image, attributing failures to the sniffed input
/// format.
pub(crate) fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|err| ConvertError::Decode {
        format: sniff::detect_raster(bytes)
            .map(|format| format.extension().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        detail: err.to_string(),
    })
}

/// Encode as PNG at maximum compression. Quality does not apply.
pub(crate) fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut buffer,
        CompressionType::Best,
        FilterType::Adaptive,
    );
    img.write_with_encoder(encoder)
        .map_err(|err| ConvertError::Encode(format!("png: {err}")))?;
    Ok(buffer)
}

/// Encode as baseline JPEG at the given quality, flattening to RGB8.
pub(crate) fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = img.to_rgb8();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| ConvertError::Encode(format!("jpeg: {err}")))?;
    Ok(buffer)
}

/// Encode as lossy WebP at the given quality.
///
/// The `image` crate's WebP encoder is lossless-only, so the quality
/// parameter goes through the `webp` crate instead.
fn encode_webp(img: &DynamicImage, quality: u8) -> Vec<u8> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    webp::Encoder::from_rgba(rgba.as_raw(), width, height)
        .encode(f32::from(quality))
        .to_vec()
}
