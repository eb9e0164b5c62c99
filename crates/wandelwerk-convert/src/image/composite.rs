// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image compositor — lay out N images on one canvas along an axis and
// flatten to a single output image.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage, imageops};
use tracing::{debug, info, instrument};

use wandelwerk_core::error::{ConvertError, Result};
use wandelwerk_core::types::Direction;

use super::transcode::{decode, encode_jpeg, encode_png};

/// Dimensions and channel depth of one decoded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl ImageMetadata {
    pub fn of(img: &DynamicImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            channels: img.color().channel_count(),
        }
    }
}

/// Encode target for a merged canvas.
///
/// The default path is lossy for file-size reasons; callers that need the
/// merged output to keep transparency must ask for `Lossless` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergedOutput {
    /// JPEG at the given quality over an opaque white canvas.
    Lossy { quality: u8 },
    /// PNG over a transparent canvas.
    Lossless,
}

/// Where one source image lands on the merged canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub source_index: usize,
    pub left: u32,
    pub top: u32,
}

/// Computed layout for a merge: canvas size plus one placement per input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasPlan {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
}

impl CanvasPlan {
    /// Lay out images along `direction`, strictly in input order.
    ///
    /// Vertical: canvas width is the widest input, canvas height the sum of
    /// all heights, each image at left 0 with a running top offset.
    /// Horizontal is the same with the axes swapped. Inputs are never
    /// scaled or cropped to a common size — a smaller image on the
    /// non-stacking axis leaves canvas background visible beside it.
    pub fn layout(inputs: &[ImageMetadata], direction: Direction) -> Self {
        let mut placements = Vec::with_capacity(inputs.len());
        let mut offset = 0u32;
        let mut max_width = 0u32;
        let mut max_height = 0u32;

        for (source_index, meta) in inputs.iter().enumerate() {
            max_width = max_width.max(meta.width);
            max_height = max_height.max(meta.height);

            let (left, top) = match direction {
                Direction::Vertical => (0, offset),
                Direction::Horizontal => (offset, 0),
            };
            placements.push(Placement {
                source_index,
                left,
                top,
            });

            offset += match direction {
                Direction::Vertical => meta.height,
                Direction::Horizontal => meta.width,
            };
        }

        let (width, height) = match direction {
            Direction::Vertical => (max_width, offset),
            Direction::Horizontal => (offset, max_height),
        };

        Self {
            width,
            height,
            placements,
        }
    }
}

/// Merge encoded images onto one canvas along `direction`.
///
/// A single input is passed through byte-identical; no format conversion is
/// forced on it. With two or more inputs, every image is decoded up front,
/// the canvas plan is validated before any allocation, and images are
/// placed strictly in input order. The canvas background and channel depth
/// follow the encode target so transparency is not silently lost.
#[instrument(skip(inputs), fields(count = inputs.len(), ?direction, ?output))]
pub fn composite(inputs: &[&[u8]], direction: Direction, output: MergedOutput) -> Result<Vec<u8>> {
    if inputs.is_empty() {
        return Err(ConvertError::NoInput);
    }
    if inputs.len() == 1 {
        debug!("single input — passthrough without re-encode");
        return Ok(inputs[0].to_vec());
    }

    let decoded = inputs
        .iter()
        .map(|bytes| decode(bytes))
        .collect::<Result<Vec<_>>>()?;
    let metadata: Vec<ImageMetadata> = decoded.iter().map(ImageMetadata::of).collect();

    // A zero-sized input would corrupt the running offsets; reject before
    // planning the canvas.
    for meta in &metadata {
        if meta.width == 0 || meta.height == 0 {
            return Err(ConvertError::InvalidDimensions {
                width: meta.width,
                height: meta.height,
            });
        }
    }

    let plan = CanvasPlan::layout(&metadata, direction);
    if plan.width == 0 || plan.height == 0 {
        return Err(ConvertError::InvalidDimensions {
            width: plan.width,
            height: plan.height,
        });
    }

    info!(width = plan.width, height = plan.height, "canvas planned");

    match output {
        MergedOutput::Lossy { quality } => {
            let mut canvas = RgbImage::from_pixel(plan.width, plan.height, Rgb([255, 255, 255]));
            for placement in &plan.placements {
                let source = decoded[placement.source_index].to_rgb8();
                imageops::overlay(
                    &mut canvas,
                    &source,
                    i64::from(placement.left),
                    i64::from(placement.top),
                );
            }
            encode_jpeg(&DynamicImage::ImageRgb8(canvas), quality)
        }
        MergedOutput::Lossless => {
            let mut canvas = RgbaImage::from_pixel(plan.width, plan.height, Rgba([0, 0, 0, 0]));
            for placement in &plan.placements {
                let source = decoded[placement.source_index].to_rgba8();
                imageops::overlay(
                    &mut canvas,
                    &source,
                    i64::from(placement.left),
                    i64::from(placement.top),
                );
            }
            encode_png(&DynamicImage::ImageRgba8(canvas))
        }
    }
}
