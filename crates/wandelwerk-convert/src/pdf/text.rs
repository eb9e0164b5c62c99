// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-to-PDF writer — render plain UTF-8 text onto A4 pages with the
// built-in Helvetica font. Greedy word-wrap at an estimated glyph width,
// automatic page breaks. Good enough for the txt-upload path; this is not
// a typesetter.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, instrument};

use wandelwerk_core::error::Result;

// A4 layout constants for rendered text pages.
const PAGE_W_MM: f32 = 210.0;
const PAGE_H_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_PT: f32 = 14.0;
const PT_PER_MM: f32 = 72.0 / 25.4;
// Average Helvetica glyph width is roughly half the font size.
const AVG_GLYPH_WIDTH_PT: f32 = 0.5 * FONT_SIZE_PT;

/// Render plain text into a PDF document.
///
/// Empty input still produces a valid single blank page.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn text_to_pdf(text: &str) -> Result<Vec<u8>> {
    let margin_pt = MARGIN_MM * PT_PER_MM;
    let page_h_pt = PAGE_H_MM * PT_PER_MM;
    let usable_w_pt = (PAGE_W_MM - 2.0 * MARGIN_MM) * PT_PER_MM;

    let max_chars = (usable_w_pt / AVG_GLYPH_WIDTH_PT).max(1.0) as usize;
    let lines_per_page = (((page_h_pt - 2.0 * margin_pt) / LINE_HEIGHT_PT) as usize).max(1);

    let lines = wrap(text, max_chars);
    debug!(lines = lines.len(), max_chars, lines_per_page, "text laid out");

    let mut doc = PdfDocument::new("Wandelwerk Text");
    let mut pages: Vec<PdfPage> = Vec::new();

    for chunk in lines.chunks(lines_per_page) {
        let mut ops: Vec<Op> = Vec::new();
        for (row, line) in chunk.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y_pt = page_h_pt - margin_pt - (row as f32 * LINE_HEIGHT_PT);
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(margin_pt),
                    y: Pt(y_pt),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(FONT_SIZE_PT),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::EndTextSection);
        }
        pages.push(PdfPage::new(Mm(PAGE_W_MM), Mm(PAGE_H_MM), ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(Mm(PAGE_W_MM), Mm(PAGE_H_MM), Vec::new()));
    }

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Greedy word-wrap to at most `max_chars` characters per line.
///
/// Paragraph breaks in the input survive as empty lines. Words longer than
/// a full line are hard-broken on character boundaries.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_chars) {
                    lines.push(piece.iter().collect());
                }
                continue;
            }

            let current_len = current.chars().count();
            if current.is_empty() {
                current.push_str(word);
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_loadable_single_page_pdf() {
        let pdf = text_to_pdf("hello converter\nsecond line").unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn empty_text_still_yields_one_blank_page() {
        let pdf = text_to_pdf("").unwrap();
        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_text_breaks_across_pages() {
        let text = "lorem ipsum dolor sit amet\n".repeat(400);
        let pdf = text_to_pdf(&text).unwrap();
        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn wrap_respects_the_width_limit() {
        let lines = wrap("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
        for line in &lines {
            assert!(line.chars().count() <= 7);
        }
    }

    #[test]
    fn wrap_hard_breaks_oversized_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", ""]);
    }

    #[test]
    fn wrap_keeps_paragraph_breaks() {
        let lines = wrap("one\n\ntwo", 20);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn wrap_is_char_safe_for_multibyte_input() {
        let lines = wrap("ääääääää", 3);
        assert_eq!(lines, vec!["äää", "äää", "ää", ""]);
    }
}
