// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Wandelwerk.

use thiserror::Error;

/// Top-level error type for all conversion operations.
///
/// Every failure is terminal for the current request: the causes are
/// deterministic given the same input, so nothing is retried and no partial
/// output is ever returned.
#[derive(Debug, Error)]
pub enum ConvertError {
    // -- Request validation --
    #[error("no input files provided")]
    NoInput,

    #[error("operation {operation} requires exactly one input, got {actual}")]
    Arity {
        operation: &'static str,
        actual: usize,
    },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    // -- Image errors --
    #[error("failed to decode {format} input: {detail}")]
    Decode { format: String, detail: String },

    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Encode(String),

    // -- PDF errors --
    #[error("input #{index} is not a loadable PDF: {detail}")]
    MalformedInput { index: usize, detail: String },

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image to PDF embedding failed: {0}")]
    Embed(String),

    // -- Capability gaps --
    #[error("not implemented: {capability}")]
    NotImplemented { capability: String },

    // -- Transport boundary --
    #[error("invalid options document: {0}")]
    Options(#[from] serde_json::Error),
}

/// Alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ConvertError>;
