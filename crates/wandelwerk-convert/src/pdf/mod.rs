// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page assembly from existing PDFs and creation of new PDFs
// from images and plain text.

pub mod assembler;
pub mod embed;
pub mod text;

pub use assembler::{PdfAssembler, merge_pdfs};
pub use embed::embed_image;
pub use text::text_to_pdf;
