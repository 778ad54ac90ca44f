//! Chapter opening pages: the numbered chapter name under a coloured rule,
//! followed by the folder's description in italics. Long descriptions continue
//! onto further pages.

use super::{description_colour, heading_colour, page_index, remaining_chars, rule_rgb, Spans};
use crate::document::ChapterSection;
use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::fonts::FontIds;
use anyhow::{anyhow, Result};
use pdf_gen::pdf_writer_crate::types::LineCapStyle;
use pdf_gen::pdf_writer_crate::Content;
use pdf_gen::*;

/// Returns the page index of the chapter's opening page.
pub fn render(
    config: &PDF,
    doc: &mut Document,
    font_ids: &FontIds,
    chapter: &ChapterSection,
) -> Result<usize> {
    let heading_size = Pt(config.font_size_heading_pt);
    let body_size = Pt(config.font_size_body_pt);
    let heading = format!("{}. {}", chapter.number, chapter.name);

    let mut description: Spans = chapter
        .description_text()
        .map(|text| {
            vec![(
                format!("{text}\n"),
                description_colour(),
                SpanFont {
                    id: font_ids.italic,
                    size: body_size,
                },
            )]
        })
        .unwrap_or_default();

    let mut first_page = None;
    loop {
        let mut page = Page::new(
            config.page_size(),
            Some(config.margins(doc.page_order.len())),
        );
        let (x, mut y) = layout::baseline_start(&page, &doc.fonts[font_ids.bold], heading_size);

        if first_page.is_none() {
            page.add_span(SpanLayout {
                text: heading.clone(),
                font: SpanFont {
                    id: font_ids.bold,
                    size: heading_size,
                },
                colour: heading_colour(),
                coords: (x, y),
            });

            let descent = *doc.fonts[font_ids.bold].descent(heading_size);
            let rule_y = y - Pt(descent.abs() + 4.0);
            let (r, g, b) = rule_rgb();
            let mut rule = Content::new();
            rule.set_stroke_rgb(r, g, b)
                .set_line_cap(LineCapStyle::ButtCap)
                .set_line_width(1.0)
                .move_to(*page.content_box.x1, *rule_y)
                .line_to(*page.content_box.x2, *rule_y)
                .stroke();
            page.add_content(rule);

            y = rule_y - doc.fonts[font_ids.italic].line_height(body_size) * 2.0;
        }

        let before = remaining_chars(&description);
        if before > 0 {
            let bbox = page.content_box;
            layout::layout_text_naive(doc, &mut page, (x, y), &mut description, Pt(0.0), bbox);
        }

        let page_id = doc.add_page(page);
        let index = page_index(doc, page_id)?;
        let continued = first_page.is_some();
        first_page.get_or_insert(index);

        if description.is_empty() {
            break;
        }
        if continued && remaining_chars(&description) == before {
            return Err(anyhow!(
                "Description of {} doesn't fit on a page",
                chapter.name
            ));
        }
    }

    first_page.ok_or_else(|| anyhow!("Chapter {} produced no pages", chapter.name))
}
