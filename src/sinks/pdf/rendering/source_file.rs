//! Source file pages.
//!
//! Every line is prefixed with its number in a small grey font, then the
//! highlighted tokens in the theme's colours. Lines too long for the page wrap,
//! indented past the line numbers. Each page carries the file's location as its
//! running header.

use super::{heading_colour, page_index, remaining_chars, rule_rgb, underline_metrics, Spans};
use crate::document::{ChapterSection, RenderedFile};
use crate::highlight::Token;
use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::fonts::FontIds;
use anyhow::{anyhow, Result};
use pdf_gen::pdf_writer_crate::types::LineCapStyle;
use pdf_gen::pdf_writer_crate::Content;
use pdf_gen::*;

const TAB_WIDTH: usize = 4;

/// Re-split highlighted lines the way they print. `\r\n` and a lone `\r` both end
/// a line (as `\n`), and tabs expand to the next tab stop. All other text is kept
/// exactly.
fn printable_lines(lines: &[Vec<Token>]) -> Vec<Vec<Token>> {
    let mut printed = Vec::new();
    for line in lines.iter() {
        let mut current: Vec<Token> = Vec::new();
        let mut column = 0;
        let mut after_cr = false;
        for token in line.iter() {
            let mut text = String::new();
            for c in token.text.chars() {
                match c {
                    '\n' if after_cr => {}
                    '\r' | '\n' => {
                        text.push('\n');
                        current.push(Token {
                            text: std::mem::take(&mut text),
                            ..token.clone()
                        });
                        printed.push(std::mem::take(&mut current));
                        column = 0;
                    }
                    '\t' => {
                        let width = TAB_WIDTH - column % TAB_WIDTH;
                        text.extend(std::iter::repeat(' ').take(width));
                        column += width;
                    }
                    _ => {
                        text.push(c);
                        column += 1;
                    }
                }
                after_cr = c == '\r';
            }
            if !text.is_empty() {
                current.push(Token {
                    text,
                    ..token.clone()
                });
            }
        }
        if !current.is_empty() {
            printed.push(current);
        }
    }
    printed
}

fn spans(config: &PDF, font_ids: &FontIds, lines: &[Vec<Token>]) -> Spans {
    let text_size = Pt(config.font_size_body_pt);
    let small_size = Pt(config.font_size_small_pt);

    let mut text = Spans::default();
    for (i, line) in printable_lines(lines).into_iter().enumerate() {
        text.push((
            format!("{:>4}  ", i + 1),
            Colour::new_grey(0.75),
            SpanFont {
                id: font_ids.regular,
                size: small_size,
            },
        ));
        for token in line.into_iter() {
            let (r, g, b) = token.colour;
            text.push((
                token.text,
                Colour::new_rgb_bytes(r, g, b),
                SpanFont {
                    id: font_ids.styled(token.bold, token.italic),
                    size: text_size,
                },
            ));
        }
    }
    text
}

/// The file name sits on the outer edge of the page, where the page number is, and
/// the chapter on the inner edge when there's room for both. A rule in the chapter
/// colour runs underneath. Returns the baseline the header was set on.
fn running_header(
    config: &PDF,
    doc: &Document,
    font_ids: &FontIds,
    page: &mut Page,
    chapter: &ChapterSection,
    file: &RenderedFile,
) -> Pt {
    let size = Pt(config.font_size_subheading_pt);
    let (left, _) = layout::baseline_start(page, &doc.fonts[font_ids.regular], size);
    let (x1, x2) = (page.content_box.x1, page.content_box.x2);
    let outer_is_right = doc.page_order.len() % 2 == 0;
    let baseline = layout::baseline_start(page, &doc.fonts[font_ids.bold], size).1;

    let file_width = layout::width_of_text(&file.name, &doc.fonts[font_ids.bold], size);
    let file_x = if outer_is_right { x2 - file_width } else { left };
    page.add_span(SpanLayout {
        text: file.name.clone(),
        font: SpanFont {
            id: font_ids.bold,
            size,
        },
        colour: heading_colour(),
        coords: (file_x, baseline),
    });

    let chapter_label = format!("{}. {}", chapter.number, chapter.name);
    let chapter_width = layout::width_of_text(&chapter_label, &doc.fonts[font_ids.regular], size);
    let gap = layout::width_of_text("    ", &doc.fonts[font_ids.regular], size);
    if *file_width + *chapter_width + *gap <= *(x2 - x1) {
        let chapter_x = if outer_is_right { left } else { x2 - chapter_width };
        page.add_span(SpanLayout {
            text: chapter_label,
            font: SpanFont {
                id: font_ids.regular,
                size,
            },
            colour: Colour::new_grey(0.5),
            coords: (chapter_x, baseline),
        });
    }

    let (offset, thickness) = underline_metrics(doc, font_ids, size);
    let rule_y = *baseline + *offset - *thickness;
    let (r, g, b) = rule_rgb();
    let mut rule = Content::new();
    rule.set_stroke_rgb(r, g, b)
        .set_line_cap(LineCapStyle::ButtCap)
        .set_line_width(*thickness)
        .move_to(*x1, rule_y)
        .line_to(*x2, rule_y)
        .stroke();
    page.add_content(rule);

    baseline
}

/// Returns the page index of the file's first page. Every file gets at least one
/// page, so its table of contents entry always has a target.
pub fn render(
    config: &PDF,
    doc: &mut Document,
    font_ids: &FontIds,
    chapter: &ChapterSection,
    file: &RenderedFile,
) -> Result<usize> {
    let text_size = Pt(config.font_size_body_pt);
    let small_size = Pt(config.font_size_small_pt);
    let subheading_size = Pt(config.font_size_subheading_pt);

    let mut text = spans(config, font_ids, &file.highlighted.lines);
    if text.is_empty() {
        text.push((
            "(empty file)\n".to_string(),
            Colour::new_grey(0.5),
            SpanFont {
                id: font_ids.italic,
                size: text_size,
            },
        ));
    }

    let wrap_width = layout::width_of_text("      ", &doc.fonts[font_ids.regular], small_size);

    let mut first_page = None;
    while !text.is_empty() {
        let mut page = Page::new(
            config.page_size(),
            Some(config.margins(doc.page_order.len())),
        );
        let header_baseline = running_header(config, doc, font_ids, &mut page, chapter, file);

        let (x, _) = layout::baseline_start(&page, &doc.fonts[font_ids.regular], text_size);
        let start = (
            x,
            header_baseline - doc.fonts[font_ids.regular].line_height(subheading_size) * 2.0,
        );
        let bbox = page.content_box;

        let before = remaining_chars(&text);
        layout::layout_text_naive(doc, &mut page, start, &mut text, wrap_width, bbox);
        if remaining_chars(&text) == before {
            return Err(anyhow!("Text doesn't fit on a page"));
        }

        let page_id = doc.add_page(page);
        let index = page_index(doc, page_id)?;
        first_page.get_or_insert(index);
    }

    first_page.ok_or_else(|| anyhow!("No pages were produced"))
}
