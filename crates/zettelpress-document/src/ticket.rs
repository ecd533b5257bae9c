// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ticket renderer — lay out title, description, and an optional image on a
// single 80mm thermal-roll page using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: the page is a `Vec<Op>` operation
// list inside a `PdfPage`, serialised via `PdfDocument::save()`. The roll
// page is fixed at 226×800pt with 12pt margins; content that runs past the
// bottom margin is dropped rather than flowed onto a second page.

use std::path::Path;

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use zettelpress_core::error::{Result, ZettelpressError};
use zettelpress_core::types::TicketRequest;

/// Roll canvas width in points (80mm paper, printable area).
const PAGE_WIDTH_PT: f32 = 226.0;

/// Roll canvas height in points.
const PAGE_HEIGHT_PT: f32 = 800.0;

/// Margin on all four sides.
const MARGIN_PT: f32 = 12.0;

const TITLE_SIZE_PT: f32 = 14.0;
const TITLE_LEADING_PT: f32 = 18.0;
const BODY_SIZE_PT: f32 = 10.0;
const BODY_LEADING_PT: f32 = 13.0;

/// Vertical gap between the title block and the description.
const TITLE_GAP_PT: f32 = 8.0;

/// Vertical gap between the text and an attached image.
const IMAGE_GAP_PT: f32 = 10.0;

/// Images with less remaining roll height than this are dropped.
const MIN_IMAGE_PT: f32 = 24.0;

/// 1pt = 0.3528mm.
const MM_PER_PT: f32 = 0.3528;

/// Assumed raster density when sizing embedded images.
const IMAGE_DPI: f32 = 150.0;

/// Lays ticket content out on the thermal roll page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketRenderer;

impl TicketRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a ticket to PDF bytes.
    ///
    /// `image` is expected to be pre-processed (see
    /// [`crate::image::prepare_ticket_image`]); a buffer that fails to
    /// decode is skipped with a warning rather than failing the ticket.
    #[instrument(skip_all, fields(title = %ticket.title, with_image = image.is_some()))]
    pub fn render(&self, ticket: &TicketRequest, image: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(ticket.title.as_str());
        let mut ops: Vec<Op> = Vec::new();

        let content_width_pt = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
        let mut cursor_y = PAGE_HEIGHT_PT - MARGIN_PT - TITLE_SIZE_PT;

        for line in wrap_text(&ticket.title, chars_per_line(TITLE_SIZE_PT, content_width_pt)) {
            if cursor_y < MARGIN_PT {
                break;
            }
            push_text_line(&mut ops, line, BuiltinFont::HelveticaBold, TITLE_SIZE_PT, cursor_y);
            cursor_y -= TITLE_LEADING_PT;
        }

        cursor_y -= TITLE_GAP_PT;

        let mut dropped = 0usize;
        for line in wrap_text(
            &ticket.description,
            chars_per_line(BODY_SIZE_PT, content_width_pt),
        ) {
            if cursor_y < MARGIN_PT {
                dropped += 1;
                continue;
            }
            push_text_line(&mut ops, line, BuiltinFont::Helvetica, BODY_SIZE_PT, cursor_y);
            cursor_y -= BODY_LEADING_PT;
        }
        if dropped > 0 {
            warn!(dropped, "description lines past the bottom margin were dropped");
        }

        if let Some(bytes) = image {
            place_image(&mut doc, &mut ops, bytes, cursor_y, content_width_pt);
        }

        let page_w = Mm(PAGE_WIDTH_PT * MM_PER_PT);
        let page_h = Mm(PAGE_HEIGHT_PT * MM_PER_PT);
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        debug!("ticket layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }

    /// Render a ticket and write the PDF directly to a file.
    pub fn render_to_file(
        &self,
        ticket: &TicketRequest,
        image: Option<&[u8]>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.render(ticket, image)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("wrote ticket PDF to {}", path.as_ref().display());
        Ok(())
    }
}

/// Place the ticket image below the text, scaled to fit the content width
/// and the remaining roll height. Never upscales.
fn place_image(
    doc: &mut PdfDocument,
    ops: &mut Vec<Op>,
    bytes: &[u8],
    cursor_y: f32,
    content_width_pt: f32,
) {
    let available_h = cursor_y - IMAGE_GAP_PT - MARGIN_PT;
    if available_h < MIN_IMAGE_PT {
        warn!("no roll height left for the ticket image, skipping it");
        return;
    }

    let dynamic = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(err) => {
            warn!(error = %err, "ticket image buffer failed to decode, skipping it");
            return;
        }
    };

    let width_px = dynamic.width() as usize;
    let height_px = dynamic.height() as usize;
    let rgb = dynamic.to_rgb8();
    let raw = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: width_px,
        height: height_px,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let xobject_id = doc.add_image(&raw);

    let img_w_pt = width_px as f32 / IMAGE_DPI * 72.0;
    let img_h_pt = height_px as f32 / IMAGE_DPI * 72.0;
    let scale = (content_width_pt / img_w_pt)
        .min(available_h / img_h_pt)
        .min(1.0);

    let rendered_w_pt = img_w_pt * scale;
    let rendered_h_pt = img_h_pt * scale;
    let x_offset = MARGIN_PT + (content_width_pt - rendered_w_pt) / 2.0;
    let y_offset = cursor_y - IMAGE_GAP_PT - rendered_h_pt;

    ops.push(Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x_offset)),
            translate_y: Some(Pt(y_offset)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            rotate: None,
        },
    });

    debug!(rendered_w_pt, rendered_h_pt, scale, "image placed on ticket");
}

fn push_text_line(ops: &mut Vec<Op>, line: String, font: BuiltinFont, size_pt: f32, y_pt: f32) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(MARGIN_PT),
            y: Pt(y_pt),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(line)],
        font,
    });
    ops.push(Op::EndTextSection);
}

/// Estimated characters per line for built-in Helvetica: average glyph
/// width is roughly half the font size.
fn chars_per_line(font_size_pt: f32, content_width_pt: f32) -> usize {
    ((content_width_pt / (0.5 * font_size_pt)) as usize).max(1)
}

/// Word-wrap `text` so no line exceeds `max_chars` characters. Existing
/// newlines start new paragraphs; words wider than the roll are
/// force-broken at character boundaries.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while char_len(word) > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split = word
                    .char_indices()
                    .nth(max_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                let (head, tail) = word.split_at(split);
                lines.push(head.to_string());
                word = tail;
            }
            if current.is_empty() {
                current.push_str(word);
            } else if char_len(&current) + 1 + char_len(word) <= max_chars {
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

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn ticket() -> TicketRequest {
        TicketRequest::new("Broken vending machine", "Machine 3 in the lobby keeps the coin.")
    }

    fn png_fixture() -> Vec<u8> {
        let img = GrayImage::from_fn(16, 16, |x, y| Luma([if (x + y) % 2 == 0 { 0 } else { 255 }]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode fixture");
        bytes
    }

    #[test]
    fn renders_a_pdf() {
        let bytes = TicketRenderer::new()
            .render(&ticket(), None)
            .expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_with_an_image() {
        let png = png_fixture();
        let bytes = TicketRenderer::new()
            .render(&ticket(), Some(&png))
            .expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn undecodable_image_is_skipped_not_fatal() {
        let bytes = TicketRenderer::new()
            .render(&ticket(), Some(b"not an image"))
            .expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_ticket_still_renders() {
        let empty = TicketRequest::new("", "");
        let bytes = TicketRenderer::new().render(&empty, None).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn overlong_description_does_not_overflow_the_roll() {
        let long = "word ".repeat(2000);
        let request = TicketRequest::new("Long one", long);
        let bytes = TicketRenderer::new().render(&request, None).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_respects_paragraphs_and_width() {
        let lines = wrap_text("alpha beta gamma\n\ndelta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma", "", "delta"]);
    }

    #[test]
    fn wrap_force_breaks_oversized_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }
}
