// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte-level format sniffing.
//
// Best-effort classification from leading bytes, independent of filename
// extension. This is not a codec sniff: image formats are not decoded here —
// bad image data fails explicitly at the transcoder's decode step.

use crate::types::RasterFormat;

/// Result of content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedKind {
    /// Starts with the `%PDF` header.
    Pdf,
    /// Zip local-file-header magic. Ambiguous — docx/xlsx/pptx and any
    /// other zip-based container look identical from here, so callers
    /// treat this as unsupported rather than guessing.
    ZipContainer,
    /// Mostly NUL-free leading bytes.
    Text,
    Unknown,
}

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK";
/// How much of the buffer the text heuristic samples.
const TEXT_SAMPLE_LEN: usize = 512;
/// A sample counts as text when fewer than 10% of its bytes are NUL.
const TEXT_NUL_PERCENT: usize = 10;

/// Classify a byte buffer. Never panics; empty input is `Unknown`.
pub fn detect(bytes: &[u8]) -> SniffedKind {
    if bytes.starts_with(PDF_MAGIC) {
        return SniffedKind::Pdf;
    }
    if bytes.starts_with(ZIP_MAGIC) {
        return SniffedKind::ZipContainer;
    }
    if bytes.is_empty() {
        return SniffedKind::Unknown;
    }

    let sample = &bytes[..bytes.len().min(TEXT_SAMPLE_LEN)];
    let nul_count = sample.iter().filter(|byte| **byte == 0).count();
    if nul_count * 100 < sample.len() * TEXT_NUL_PERCENT {
        SniffedKind::Text
    } else {
        SniffedKind::Unknown
    }
}

/// Identify a raster image format from its magic bytes.
///
/// Covers the formats the engine can embed or transcode from; anything else
/// is `None` and left for the decoder to reject with a precise error.
pub fn detect_raster(bytes: &[u8]) -> Option<RasterFormat> {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if bytes.len() >= 8 && bytes[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Some(RasterFormat::Png);
    }
    // JPEG: FF D8 FF
    if bytes.len() >= 3 && bytes[..3] == [0xFF, 0xD8, 0xFF] {
        return Some(RasterFormat::Jpeg);
    }
    // WebP: "RIFF" at offset 0 and "WEBP" at offset 8
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some(RasterFormat::WebP);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pdf_header() {
        assert_eq!(detect(b"%PDF-1.7\n%binary"), SniffedKind::Pdf);
    }

    #[test]
    fn detects_zip_container() {
        assert_eq!(detect(b"PK\x03\x04rest-of-archive"), SniffedKind::ZipContainer);
    }

    #[test]
    fn plain_text_classifies_as_text() {
        assert_eq!(detect(b"hello, converter"), SniffedKind::Text);
        // A single printable byte still counts.
        assert_eq!(detect(b"A"), SniffedKind::Text);
    }

    #[test]
    fn nul_heavy_data_is_unknown() {
        let mut data = vec![0u8; 512];
        data[0] = b'x';
        assert_eq!(detect(&data), SniffedKind::Unknown);
    }

    #[test]
    fn empty_buffer_is_unknown_not_a_panic() {
        assert_eq!(detect(&[]), SniffedKind::Unknown);
    }

    #[test]
    fn text_threshold_is_below_ten_percent() {
        // Exactly 10% NUL in a 100-byte sample: not text.
        let mut data = vec![b'a'; 100];
        for byte in data.iter_mut().take(10) {
            *byte = 0;
        }
        assert_eq!(detect(&data), SniffedKind::Unknown);

        // 9% NUL: text.
        let mut data = vec![b'a'; 100];
        for byte in data.iter_mut().take(9) {
            *byte = 0;
        }
        assert_eq!(detect(&data), SniffedKind::Text);
    }

    #[test]
    fn raster_magic_numbers() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(detect_raster(&png), Some(RasterFormat::Png));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        assert_eq!(detect_raster(&jpeg), Some(RasterFormat::Jpeg));

        let webp = *b"RIFF\x24\x00\x00\x00WEBPVP8 ";
        assert_eq!(detect_raster(&webp), Some(RasterFormat::WebP));

        assert_eq!(detect_raster(b"GIF89a"), None);
        assert_eq!(detect_raster(&[]), None);
        assert_eq!(detect_raster(&[0xFF, 0xD8]), None);
    }
}
