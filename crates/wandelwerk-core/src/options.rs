// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion options.
//
// Options are an explicit struct passed by value into every call — the
// engine never reads ambient or global state. Upload clients send them as a
// small JSON document; unrecognised fields are ignored, not errors.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Direction;

/// Default quality for lossy encoders.
pub const DEFAULT_QUALITY: u8 = 80;
/// Lowest quality a caller can request; lower values are clamped up.
pub const MIN_QUALITY: u8 = 30;
/// Highest quality a caller can request; higher values are clamped down.
pub const MAX_QUALITY: u8 = 100;

/// Caller-supplied conversion options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Quality for lossy encoders, clamped to [30, 100] at the point of
    /// use. Ignored by lossless formats.
    pub quality: u8,
    /// Stacking axis for image merges. Operations that encode the
    /// direction in their name override this field.
    pub direction: Direction,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            direction: Direction::Vertical,
        }
    }
}

impl ConversionOptions {
    /// Parse the options JSON document sent by an upload client.
    /// Unknown fields are ignored.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Quality clamped to the range the lossy encoders accept.
    pub fn clamped_quality(&self) -> u8 {
        self.quality.clamp(MIN_QUALITY, MAX_QUALITY)
    }
}
