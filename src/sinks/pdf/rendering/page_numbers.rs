use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::fonts::FontIds;
use pdf_gen::*;

/// Number every page from `first_content_page` on, starting at 1, on the outer
/// edge below the content box. These are the numbers the contents pages list.
pub fn render(config: &PDF, doc: &mut Document, font_ids: &FontIds, first_content_page: usize) {
    let size = Pt(config.font_size_small_pt);
    let line_height = doc.fonts[font_ids.regular].line_height(size);

    for (pi, page_id) in doc.page_order.iter().enumerate().skip(first_content_page) {
        let Some(page) = doc.pages.get_mut(*page_id) else {
            continue;
        };

        let text = format!("{}", pi - first_content_page + 1);
        let width = layout::width_of_text(&text, &doc.fonts[font_ids.regular], size);
        let x = if pi % 2 == 0 {
            page.content_box.x2 - width
        } else {
            page.content_box.x1
        };
        let y = page.content_box.y1 - line_height;

        page.add_span(SpanLayout {
            text,
            font: SpanFont {
                id: font_ids.regular,
                size,
            },
            colour: Colour::new_grey(0.25),
            coords: (x, y),
        });
    }
}
