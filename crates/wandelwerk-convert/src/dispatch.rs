// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion dispatcher — the orchestration surface of the engine.
//
// One request moves through received → validated → routed → executed with
// no intermediate suspension. Routing is an exhaustive match over the
// closed operation enumeration; raw operation strings exist only in
// `convert_named`, which parses them exactly once.

use tracing::{debug, info, info_span, warn};

use wandelwerk_core::error::{ConvertError, Result};
use wandelwerk_core::options::ConversionOptions;
use wandelwerk_core::sniff::{self, SniffedKind};
use wandelwerk_core::types::{InputAsset, Operation, RequestId};

use crate::image::composite::{MergedOutput, composite};
use crate::image::transcode::transcode;
use crate::pdf::assembler::merge_pdfs;
use crate::pdf::embed::embed_image;
use crate::pdf::text::text_to_pdf;

/// Result of one conversion: the output bytes, their MIME type, and
/// whether the bytes are a raster stand-in for a requested vector format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutput {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// Set when `svg` was requested: the MIME type still says
    /// `image/svg+xml` but the bytes are a PNG raster, and the caller must
    /// be able to tell.
    pub raster_fallback: bool,
}

/// Parse a transport-level operation name, then convert.
///
/// Unknown names become `UnsupportedOperation`; this is the only runtime
/// path for unrecognised strings.
pub fn convert_named(
    inputs: &[InputAsset],
    operation: &str,
    options: &ConversionOptions,
) -> Result<ConvertOutput> {
    let parsed = Operation::parse(operation)
        .ok_or_else(|| ConvertError::UnsupportedOperation(operation.to_string()))?;
    convert(inputs, parsed, options)
}

/// Run one conversion request: validate, route, execute.
///
/// Inputs are processed strictly in list order. Nothing is shared across
/// requests, and every buffer is dropped when the call returns — on
/// success and failure alike.
pub fn convert(
    inputs: &[InputAsset],
    operation: Operation,
    options: &ConversionOptions,
) -> Result<ConvertOutput> {
    let request = RequestId::new();
    let span = info_span!(
        "convert",
        %request,
        operation = operation.name(),
        inputs = inputs.len()
    );
    let _guard = span.enter();

    if inputs.is_empty() {
        return Err(ConvertError::NoInput);
    }
    if operation.single_input() && inputs.len() > 1 {
        return Err(ConvertError::Arity {
            operation: operation.name(),
            actual: inputs.len(),
        });
    }

    let result = route(inputs, operation, options);
    match &result {
        Ok(output) => info!(
            bytes = output.bytes.len(),
            mime = output.mime,
            "conversion complete"
        ),
        Err(err) => warn!(%err, "conversion failed"),
    }
    result
}

fn route(
    inputs: &[InputAsset],
    operation: Operation,
    options: &ConversionOptions,
) -> Result<ConvertOutput> {
    match operation {
        Operation::MergePdf => {
            let buffers: Vec<&[u8]> = inputs.iter().map(|asset| asset.bytes.as_slice()).collect();
            Ok(ConvertOutput {
                bytes: merge_pdfs(&buffers)?,
                mime: operation.output_mime(),
                raster_fallback: false,
            })
        }
        Operation::MergeImages(direction) => {
            let buffers: Vec<&[u8]> = inputs.iter().map(|asset| asset.bytes.as_slice()).collect();
            let merged = composite(
                &buffers,
                direction,
                MergedOutput::Lossy {
                    quality: options.clamped_quality(),
                },
            )?;
            Ok(ConvertOutput {
                bytes: merged,
                mime: operation.output_mime(),
                raster_fallback: false,
            })
        }
        Operation::Transcode(format) => {
            let transcoded = transcode(&inputs[0].bytes, format, options.clamped_quality())?;
            let raster_fallback = transcoded.is_fallback();
            Ok(ConvertOutput {
                bytes: transcoded.into_bytes(),
                mime: operation.output_mime(),
                raster_fallback,
            })
        }
        Operation::ToPdf => to_pdf(&inputs[0]),
        Operation::Document(target) => Err(ConvertError::NotImplemented {
            capability: format!(
                "{} document conversion (requires an external converter such as LibreOffice)",
                target.name()
            ),
        }),
    }
}

/// The `pdf` operation: pass PDFs through, render text, embed images.
fn to_pdf(asset: &InputAsset) -> Result<ConvertOutput> {
    let bytes = match sniff::detect(&asset.bytes) {
        SniffedKind::Pdf => {
            debug!("input is already a PDF — passthrough");
            asset.bytes.clone()
        }
        SniffedKind::ZipContainer => {
            return Err(ConvertError::UnsupportedFormat(
                "zip-based container (docx/xlsx/pptx or similar)".to_string(),
            ));
        }
        kind => {
            // The declared extension wins; magic bytes break ties for
            // renamed or extension-less uploads.
            let raster = asset.declared_format().or_else(|| sniff::detect_raster(&asset.bytes));
            if let Some(format) = raster {
                embed_image(&asset.bytes, format)?
            } else if kind == SniffedKind::Text {
                text_to_pdf(&String::from_utf8_lossy(&asset.bytes))?
            } else {
                return Err(ConvertError::UnsupportedFormat(
                    "input is neither a PDF, a known raster image, nor plain text".to_string(),
                ));
            }
        }
    };

    Ok(ConvertOutput {
        bytes,
        mime: "application/pdf",
        raster_fallback: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::text::text_to_pdf;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;
    use wandelwerk_core::types::{Direction, DocumentTarget, RasterFormat};

    fn png_asset(width: u32, height: u32) -> InputAsset {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([60, 120, 180])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        InputAsset::with_extension(out, "png")
    }

    fn options() -> ConversionOptions {
        ConversionOptions::default()
    }

    #[test]
    fn empty_inputs_fail_validation_for_every_operation() {
        for operation in [
            Operation::MergePdf,
            Operation::MergeImages(Direction::Vertical),
            Operation::Transcode(RasterFormat::Png),
            Operation::ToPdf,
            Operation::Document(DocumentTarget::Docx),
        ] {
            let err = convert(&[], operation, &options()).unwrap_err();
            assert!(matches!(err, ConvertError::NoInput), "{operation:?}");
        }
    }

    #[test]
    fn transcode_rejects_multiple_inputs() {
        let assets = [png_asset(4, 4), png_asset(4, 4)];
        let err = convert(&assets, Operation::Transcode(RasterFormat::Jpeg), &options())
            .unwrap_err();
        match err {
            ConvertError::Arity { operation, actual } => {
                assert_eq!(operation, "jpg");
                assert_eq!(actual, 2);
            }
            other => panic!("expected Arity, got {other:?}"),
        }
    }

    #[test]
    fn document_targets_fail_with_the_capability_name_regardless_of_input() {
        let assets = [png_asset(4, 4), png_asset(4, 4)];
        let err = convert(&assets, Operation::Document(DocumentTarget::Docx), &options())
            .unwrap_err();
        match err {
            ConvertError::NotImplemented { capability } => {
                assert!(capability.contains("docx"), "{capability}");
            }
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn unknown_operation_names_are_rejected_at_the_boundary() {
        let err = convert_named(&[png_asset(4, 4)], "gif", &options()).unwrap_err();
        match err {
            ConvertError::UnsupportedOperation(name) => assert_eq!(name, "gif"),
            other => panic!("expected UnsupportedOperation, got {other:?}"),
        }
    }

    #[test]
    fn merge_images_reports_jpeg_output() {
        let assets = [png_asset(10, 10), png_asset(10, 10)];
        let out = convert_named(&assets, "merge-images-vertical", &options()).unwrap();
        assert_eq!(out.mime, "image/jpeg");
        assert_eq!(&out.bytes[..3], &[0xFF, 0xD8, 0xFF]);
        let merged = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((merged.width(), merged.height()), (10, 20));
    }

    #[test]
    fn operation_name_direction_wins_over_options_field() {
        let assets = [png_asset(10, 4), png_asset(10, 4)];
        let mut opts = options();
        opts.direction = Direction::Vertical;
        let out = convert_named(&assets, "merge-images-horizontal", &opts).unwrap();
        let merged = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((merged.width(), merged.height()), (20, 4));
    }

    #[test]
    fn svg_transcode_reports_the_fallback() {
        let out = convert_named(&[png_asset(6, 6)], "svg", &options()).unwrap();
        assert!(out.raster_fallback);
        assert_eq!(out.mime, "image/svg+xml");
        assert_eq!(
            &out.bytes[..8],
            &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn to_pdf_passes_existing_pdfs_through_unchanged() {
        let pdf = text_to_pdf("already a pdf").unwrap();
        let asset = InputAsset::with_extension(pdf.clone(), "pdf");
        let out = convert(&[asset], Operation::ToPdf, &options()).unwrap();
        assert_eq!(out.bytes, pdf);
        assert_eq!(out.mime, "application/pdf");
    }

    #[test]
    fn to_pdf_embeds_images() {
        let out = convert(&[png_asset(20, 30)], Operation::ToPdf, &options()).unwrap();
        assert!(out.bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&out.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn to_pdf_renders_plain_text() {
        let asset = InputAsset::with_extension(b"plain text upload".to_vec(), "txt");
        let out = convert(&[asset], Operation::ToPdf, &options()).unwrap();
        assert!(out.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn to_pdf_rejects_zip_containers() {
        let asset = InputAsset::with_extension(b"PK\x03\x04fake-docx".to_vec(), "docx");
        let err = convert(&[asset], Operation::ToPdf, &options()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }

    #[test]
    fn merge_pdf_via_dispatcher_counts_pages() {
        let first = text_to_pdf("first").unwrap();
        let second = text_to_pdf("second").unwrap();
        let assets = [InputAsset::new(first), InputAsset::new(second)];
        let out = convert_named(&assets, "merge-pdf", &options()).unwrap();
        let doc = lopdf::Document::load_mem(&out.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn quality_flows_from_options_into_the_encoder() {
        let big = {
            let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 64, |x, y| {
                Rgb([(x * 3) as u8, (y * 3) as u8, ((x ^ y) * 2) as u8])
            }));
            let mut out = Vec::new();
            img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .unwrap();
            InputAsset::with_extension(out, "png")
        };

        let mut low = options();
        low.quality = 30;
        let mut high = options();
        high.quality = 100;

        let small_out = convert_named(std::slice::from_ref(&big), "jpg", &low).unwrap();
        let large_out = convert_named(std::slice::from_ref(&big), "jpg", &high).unwrap();
        assert!(small_out.bytes.len() <= large_out.bytes.len());
    }
}
