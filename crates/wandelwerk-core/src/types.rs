// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Wandelwerk conversion engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one conversion request, recorded on tracing spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One uploaded file: the raw bytes plus whatever extension the caller
/// declared for it.
///
/// Assets live for the duration of a single conversion call and are dropped
/// when it returns. The declared extension is a hint only; the engine falls
/// back to byte-level sniffing when it is absent or unusable.
#[derive(Debug, Clone)]
pub struct InputAsset {
    /// Raw file content as uploaded.
    pub bytes: Vec<u8>,
    /// Filename extension declared by the caller, without the dot.
    pub extension: Option<String>,
}

impl InputAsset {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            extension: None,
        }
    }

    pub fn with_extension(bytes: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            extension: Some(extension.into()),
        }
    }

    /// The raster format named by the declared extension, if any.
    pub fn declared_format(&self) -> Option<RasterFormat> {
        self.extension
            .as_deref()
            .and_then(RasterFormat::from_name)
    }
}

/// Stacking axis for image merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Raster output formats the transcoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RasterFormat {
    Png,
    Jpeg,
    WebP,
    /// Requested as vector output, produced as a PNG raster fallback —
    /// the engine does no tracing and says so in the conversion result.
    Svg,
}

impl RasterFormat {
    /// Parse a format name as it appears in operation strings and filename
    /// extensions. `jpg` and `jpeg` are the same format.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// MIME type reported for output in this format.
    ///
    /// `Svg` maps to `image/svg+xml` even though the actual bytes are a PNG
    /// fallback; the caller is told via the `raster_fallback` flag on the
    /// conversion result.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Canonical filename extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Svg => "svg",
        }
    }
}

/// Office/text document targets. Recognised at the boundary so they fail
/// with a precise capability name instead of an unknown-operation error;
/// none of them is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentTarget {
    Docx,
    Xlsx,
    Pptx,
    Txt,
}

impl DocumentTarget {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            "pptx" => Some(Self::Pptx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Pptx => "pptx",
            Self::Txt => "txt",
        }
    }

    /// MIME type the target would carry if conversion existed.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Txt => "text/plain",
        }
    }
}

/// Every operation the engine can be asked to perform.
///
/// Raw operation strings exist only at the transport boundary, where
/// [`Operation::parse`] turns them into this closed enumeration exactly
/// once; everything past the boundary is exhaustive matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Concatenate the pages of N PDFs in input order.
    MergePdf,
    /// Stitch N images onto one canvas along the given axis.
    MergeImages(Direction),
    /// Re-encode a single image into the given raster format.
    Transcode(RasterFormat),
    /// Produce a PDF from a single input: passthrough, text render, or
    /// image embed depending on what the input turns out to be.
    ToPdf,
    /// Office/text target — always fails with the missing capability.
    Document(DocumentTarget),
}

impl Operation {
    /// Parse a transport-level operation name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "merge-pdf" => Some(Self::MergePdf),
            "merge-images-vertical" => Some(Self::MergeImages(Direction::Vertical)),
            "merge-images-horizontal" => Some(Self::MergeImages(Direction::Horizontal)),
            "pdf" => Some(Self::ToPdf),
            other => DocumentTarget::from_name(other)
                .map(Self::Document)
                .or_else(|| RasterFormat::from_name(other).map(Self::Transcode)),
        }
    }

    /// Canonical operation name, for error messages and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MergePdf => "merge-pdf",
            Self::MergeImages(Direction::Vertical) => "merge-images-vertical",
            Self::MergeImages(Direction::Horizontal) => "merge-images-horizontal",
            Self::Transcode(format) => format.extension(),
            Self::ToPdf => "pdf",
            Self::Document(target) => target.name(),
        }
    }

    /// Whether the operation accepts exactly one input.
    ///
    /// Merge operations tolerate a single input (passthrough), and document
    /// targets fail on the missing capability before any arity concern.
    pub fn single_input(&self) -> bool {
        matches!(self, Self::Transcode(_) | Self::ToPdf)
    }

    /// MIME type of a successful conversion's output.
    pub fn output_mime(&self) -> &'static str {
        match self {
            Self::MergePdf | Self::ToPdf => "application/pdf",
            // Merged canvases are encoded as JPEG on the default lossy path.
            Self::MergeImages(_) => "image/jpeg",
            Self::Transcode(format) => format.mime_type(),
            Self::Document(target) => target.mime_type(),
        }
    }
}
