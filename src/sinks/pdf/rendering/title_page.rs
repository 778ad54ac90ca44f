//! Title page: the notebook title, a one-line summary of what's inside, and the
//! date it was generated, centred as a block on the page. Titles too wide for the
//! page are set in a smaller size rather than clipped.

use crate::document::Document as Notebook;
use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::fonts::FontIds;
use anyhow::Result;
use pdf_gen::*;

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn summary(notebook: &Notebook) -> String {
    format!(
        "{}, {}",
        plural(notebook.chapters.len(), "chapter", "chapters"),
        plural(notebook.file_count(), "file", "files")
    )
}

pub fn render(
    config: &PDF,
    doc: &mut Document,
    font_ids: &FontIds,
    notebook: &Notebook,
) -> Result<()> {
    const SPACING: Pt = Pt(72.0 * 0.5);

    let page_size = config.page_size();
    let side: Pt = In(config.margin_side_in).into();
    let available = page_size.0 - side * 2.0;

    let title = notebook.title.to_string();
    let mut size_title = Pt(config.font_size_title_pt);
    let width_title = layout::width_of_text(&title, &doc.fonts[font_ids.bold], size_title);
    if width_title > available {
        size_title = size_title * (*available / *width_title);
    }
    let size_small = Pt(config.font_size_subheading_pt);

    let lines = [
        summary(notebook),
        chrono::Local::now().format("%B %-d, %Y").to_string(),
    ];

    let height_title = doc.fonts[font_ids.bold].line_height(size_title);
    let descent_title = doc.fonts[font_ids.bold].descent(size_title);
    let height_small = doc.fonts[font_ids.regular].line_height(size_small);
    let height_total =
        height_title + descent_title + SPACING + height_small * lines.len() as f32;

    let mut page = Page::new(page_size, None);
    let mut y: Pt = (page_size.1 + height_total) / 2.0;

    let width_title = layout::width_of_text(&title, &doc.fonts[font_ids.bold], size_title);
    page.add_span(SpanLayout {
        text: title,
        font: SpanFont {
            id: font_ids.bold,
            size: size_title,
        },
        colour: colours::BLACK,
        coords: ((page_size.0 - width_title) / 2.0, y),
    });
    y -= height_title + SPACING + descent_title;

    for line in lines.into_iter() {
        let width = layout::width_of_text(&line, &doc.fonts[font_ids.regular], size_small);
        page.add_span(SpanLayout {
            text: line,
            font: SpanFont {
                id: font_ids.regular,
                size: size_small,
            },
            colour: Colour::new_grey(0.25),
            coords: ((page_size.0 - width) / 2.0, y),
        });
        y -= height_small;
    }

    doc.add_page(page);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NotebookTitle;

    #[test]
    fn summarises_contents() {
        let notebook = Notebook {
            title: NotebookTitle::default(),
            chapters: Vec::new(),
            stylesheet: String::new(),
            skipped: Vec::new(),
        };
        assert_eq!(summary(&notebook), "0 chapters, 0 files");
        assert_eq!(plural(1, "file", "files"), "1 file");
    }
}
