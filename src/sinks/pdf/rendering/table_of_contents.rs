//! Table of contents with clickable links.
//!
//! Lists every chapter and, indented beneath it, every file, each with the page
//! number it starts on and a link to that page. The number of contents pages is
//! worked out before anything is laid out, so link targets account for the
//! contents pages themselves.

use super::{underline_metrics, PageMap};
use crate::document::Document as Notebook;
use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::fonts::FontIds;
use anyhow::{anyhow, Result};
use pdf_gen::id_arena_crate::Id;
use pdf_gen::pdf_writer_crate::types::LineCapStyle;
use pdf_gen::pdf_writer_crate::Content;
use pdf_gen::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub label: String,
    /// Body-relative page index of the target
    pub body_page: usize,
    /// Chapters are bold and flush left; files are indented
    pub is_chapter: bool,
}

/// Resolve every chapter and file to its body page. An entry without a page is
/// an error rather than a dangling link.
pub fn entries(notebook: &Notebook, pages: &PageMap) -> Result<Vec<TocEntry>> {
    let mut entries = Vec::new();
    for chapter in notebook.chapters.iter() {
        let id = chapter.id();
        let body_page = *pages
            .get(&id)
            .ok_or_else(|| anyhow!("Chapter {} has no page in the document", chapter.name))?;
        entries.push(TocEntry {
            label: format!("{}. {}", chapter.number, chapter.name),
            body_page,
            is_chapter: true,
        });

        for file in chapter.files.iter() {
            let body_page = *pages.get(file.anchor.as_str()).ok_or_else(|| {
                anyhow!("Contents entry {} has no page in the document", file.anchor)
            })?;
            entries.push(TocEntry {
                label: file.name.clone(),
                body_page,
                is_chapter: false,
            });
        }
    }
    Ok(entries)
}

/// How many entries fit between `top` and `bottom`, the first one sitting on `top`.
fn capacity(top: f32, bottom: f32, line_height: f32) -> usize {
    if top < bottom || line_height <= 0.0 {
        return 1;
    }
    (((top - bottom) / line_height) as usize + 1).max(1)
}

/// Entries per page; there is always at least one page, for the heading.
fn paginate(count: usize, first_capacity: usize, capacity: usize) -> Vec<usize> {
    let first = count.min(first_capacity);
    let mut pages = vec![first];
    let mut remaining = count - first;
    while remaining > 0 {
        let n = remaining.min(capacity);
        pages.push(n);
        remaining -= n;
    }
    pages
}

/// Render the table of contents.
///
/// Inserts the contents pages at `insert_at` and returns how many were added.
/// The count is padded to even so the pages after it keep their gutter side.
pub fn render(
    config: &PDF,
    doc: &mut Document,
    font_ids: &FontIds,
    insert_at: usize,
    entries: &[TocEntry],
) -> Result<usize> {
    let contents_size = Pt(config.font_size_heading_pt);
    let entry_size = Pt(config.font_size_body_pt);

    let height_contents = doc.fonts[font_ids.bold].line_height(contents_size);
    let height_entry = doc.fonts[font_ids.regular].line_height(entry_size);
    let descent_entry = doc.fonts[font_ids.regular].descent(entry_size);
    let indent = layout::width_of_text("    ", &doc.fonts[font_ids.regular], entry_size);

    let (underline_offset, underline_thickness) = underline_metrics(doc, font_ids, entry_size);

    let sample_page = Page::new(config.page_size(), Some(config.margins(insert_at)));
    let bottom = sample_page.content_box.y1 + descent_entry;
    let (_, heading_y) = layout::baseline_start(&sample_page, &doc.fonts[font_ids.bold], contents_size);
    let (_, entry_y) = layout::baseline_start(&sample_page, &doc.fonts[font_ids.regular], entry_size);
    let per_page = paginate(
        entries.len(),
        capacity(*(heading_y - height_contents), *bottom, *height_entry),
        capacity(*entry_y, *bottom, *height_entry),
    );

    let mut num_toc_pages = per_page.len();
    if num_toc_pages % 2 == 1 {
        num_toc_pages += 1;
    }

    let mut pages: Vec<Page> = Vec::default();
    let mut remaining = entries.iter();
    for (pi, count) in per_page.iter().enumerate() {
        let mut page = Page::new(config.page_size(), Some(config.margins(insert_at + pi)));

        let (x, mut y) = if pi == 0 {
            let (x, y) = layout::baseline_start(&page, &doc.fonts[font_ids.bold], contents_size);
            page.add_span(SpanLayout {
                text: "Table of Contents".to_string(),
                font: SpanFont {
                    id: font_ids.bold,
                    size: contents_size,
                },
                colour: colours::BLACK,
                coords: (x, y),
            });
            (x, y - height_contents)
        } else {
            layout::baseline_start(&page, &doc.fonts[font_ids.regular], entry_size)
        };

        for entry in remaining.by_ref().take(*count) {
            let (font, entry_x) = if entry.is_chapter {
                (font_ids.bold, x)
            } else {
                (font_ids.regular, x + indent)
            };
            let entry_font = SpanFont {
                id: font,
                size: entry_size,
            };

            let label_width =
                layout::width_of_text(&format!("{} ", entry.label), &doc.fonts[font], entry_size);
            // numbered as printed on the body pages
            let pagenum = format!("{}", entry.body_page + 1);
            let pagenum_width =
                layout::width_of_text(&pagenum, &doc.fonts[font_ids.regular], entry_size);
            let leader_end = page.content_box.x2
                - layout::width_of_text(
                    &format!(" {pagenum}"),
                    &doc.fonts[font_ids.regular],
                    entry_size,
                );

            if entry_x + label_width < leader_end {
                let mut underline = Content::new();
                underline
                    .set_stroke_gray(0.75)
                    .set_line_cap(LineCapStyle::ButtCap)
                    .set_line_width(*underline_thickness)
                    .move_to(*entry_x + *label_width, *y + *underline_offset)
                    .line_to(*leader_end, *y + *underline_offset)
                    .stroke();
                page.add_content(underline);
            }

            page.add_span(SpanLayout {
                text: entry.label.clone(),
                font: entry_font,
                colour: colours::BLACK,
                coords: (entry_x, y),
            });
            page.add_span(SpanLayout {
                text: pagenum,
                font: SpanFont {
                    id: font_ids.regular,
                    size: entry_size,
                },
                colour: colours::BLACK,
                coords: (page.content_box.x2 - pagenum_width, y),
            });

            page.add_intradocument_link_by_index(
                Rect {
                    x1: page.content_box.x1,
                    x2: page.content_box.x2,
                    y1: y,
                    y2: y + doc.fonts[font].ascent(entry_size),
                },
                entry.body_page + insert_at + num_toc_pages,
            );

            y -= height_entry;
        }

        pages.push(page);
    }

    while pages.len() < num_toc_pages {
        pages.push(Page::new(config.page_size(), None));
    }

    let page_ids: Vec<Id<Page>> = pages.into_iter().map(|p| doc.pages.alloc(p)).collect();
    for (i, page_id) in page_ids.into_iter().enumerate() {
        doc.page_order.insert(insert_at + i, page_id);
    }

    Ok(num_toc_pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Anchor, ChapterSection, NotebookTitle, RenderedFile};
    use crate::highlight::Highlighted;
    use std::path::PathBuf;

    fn notebook() -> Notebook {
        let file = |chapter: usize, name: &str| RenderedFile {
            anchor: Anchor::new(chapter, name),
            name: name.to_string(),
            path: PathBuf::from(name),
            highlighted: Highlighted {
                syntax: "Plain Text".to_string(),
                markup: String::new(),
                lines: Vec::new(),
            },
        };
        Notebook {
            title: NotebookTitle::default(),
            chapters: vec![
                ChapterSection {
                    number: 1,
                    name: "Root".to_string(),
                    description: None,
                    files: vec![file(1, "a.py"), file(1, "b.md")],
                },
                ChapterSection {
                    number: 2,
                    name: "pkg".to_string(),
                    description: Some("Pkg description".to_string()),
                    files: vec![file(2, "c.go")],
                },
            ],
            stylesheet: String::new(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn resolves_entries_in_reading_order() {
        let pages: PageMap = [
            ("chapter1", 0),
            ("1-a.py", 1),
            ("1-b.md", 3),
            ("chapter2", 4),
            ("2-c.go", 5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let entries = entries(&notebook(), &pages).expect("every entry has a page");
        let flat: Vec<(&str, usize, bool)> = entries
            .iter()
            .map(|e| (e.label.as_str(), e.body_page, e.is_chapter))
            .collect();

        assert_eq!(
            flat,
            vec![
                ("1. Root", 0, true),
                ("a.py", 1, false),
                ("b.md", 3, false),
                ("2. pkg", 4, true),
                ("c.go", 5, false),
            ]
        );
    }

    #[test]
    fn missing_pages_are_errors() {
        let pages: PageMap = [("chapter1", 0), ("1-a.py", 1), ("chapter2", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let err = entries(&notebook(), &pages).expect_err("1-b.md has no page");
        assert!(err.to_string().contains("1-b.md"));
    }

    #[test]
    fn paginates_entries() {
        assert_eq!(paginate(0, 10, 20), vec![0]);
        assert_eq!(paginate(7, 10, 20), vec![7]);
        assert_eq!(paginate(10, 10, 20), vec![10]);
        assert_eq!(paginate(45, 10, 20), vec![10, 20, 15]);
    }

    #[test]
    fn counts_lines_that_fit() {
        assert_eq!(capacity(100.0, 0.0, 10.0), 11);
        assert_eq!(capacity(95.0, 0.0, 10.0), 10);
        assert_eq!(capacity(0.0, 10.0, 10.0), 1);
    }
}
