// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image-to-PDF embedder — wrap a single raster image as one full-page PDF
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: the image becomes a RawImage
// XObject, the page is a `PdfPage` with a `Vec<Op>` operation list, and the
// document is serialised via `PdfDocument::save()`.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use wandelwerk_core::error::{ConvertError, Result};
use wandelwerk_core::options::DEFAULT_QUALITY;
use wandelwerk_core::types::RasterFormat;

use crate::image::transcode;

/// At 72 dpi one pixel renders as one PDF point, so the page holds the
/// image at its native size.
const EMBED_DPI: f32 = 72.0;
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Wrap one raster image as a single-page PDF.
///
/// The page is sized to the image's pixel dimensions (1 px = 1 pt) with the
/// image drawn at the origin covering the full page — no margins, no
/// scaling. PNG and JPEG embed directly; any other raster format goes
/// through a PNG transcode first, and only when that fallback also fails is
/// the operation declared unembeddable.
#[instrument(skip(bytes), fields(bytes_len = bytes.len(), ?format))]
pub fn embed_image(bytes: &[u8], format: RasterFormat) -> Result<Vec<u8>> {
    match format {
        RasterFormat::Png | RasterFormat::Jpeg => embed_decoded(bytes),
        other => {
            debug!(
                format = other.extension(),
                "not directly embeddable — transcoding to png first"
            );
            let png = transcode::transcode(bytes, RasterFormat::Png, DEFAULT_QUALITY).map_err(
                |err| {
                    ConvertError::Embed(format!(
                        "{} input could not be converted for embedding: {err}",
                        other.extension()
                    ))
                },
            )?;
            embed_decoded(png.bytes())
        }
    }
}

fn embed_decoded(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = ::image::load_from_memory(bytes)
        .map_err(|err| ConvertError::Embed(format!("failed to decode image for page: {err}")))?;

    let width = decoded.width();
    let height = decoded.height();
    let rgb = decoded.to_rgb8();

    let raw = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };

    let mut doc = PdfDocument::new("Wandelwerk Image");
    let image_id = doc.add_image(&raw);

    let page_w = Mm(width as f32 * MM_PER_PT);
    let page_h = Mm(height as f32 * MM_PER_PT);

    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            dpi: Some(EMBED_DPI),
            rotate: None,
        },
    }];

    doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

    info!(width, height, "image placed on its own page");

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}
