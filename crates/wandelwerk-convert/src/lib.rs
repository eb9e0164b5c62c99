// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wandelwerk-convert — The conversion engine.
//
// Image transcoding and canvas compositing, PDF page assembly, image- and
// text-to-PDF creation, and the dispatcher that routes one request to
// exactly one of them. Stateless and request-scoped: nothing is cached or
// shared across calls.

pub mod dispatch;
pub mod image;
pub mod pdf;

// Re-export the engine surface so callers can use `wandelwerk_convert::convert` etc.
pub use dispatch::{ConvertOutput, convert, convert_named};
pub use image::composite::{CanvasPlan, MergedOutput, composite};
pub use image::transcode::{Transcoded, transcode};
pub use pdf::assembler::{PdfAssembler, merge_pdfs};
pub use pdf::embed::embed_image;
pub use pdf::text::text_to_pdf;
