//! PDF rendering orchestration.
//!
//! Lays out the title page, then every chapter: an opening page with the heading
//! and description, followed by the pages of each of its files. While the body is
//! laid out, the page index of every chapter and file anchor is recorded; the
//! table of contents is built from those indices afterwards and inserted right
//! after the title page, at which point every bookmark is shifted past it.
//!
//! Page indices in the [`PageMap`] are relative to the start of the body, so they
//! stay valid however many contents pages end up being inserted.
//!
//! Nothing is written until the whole document is laid out.

mod chapter;
mod page_numbers;
mod source_file;
mod table_of_contents;
mod title_page;

use crate::document::Document as Notebook;
use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::fonts::{FontIds, LoadedFonts};
use anyhow::{anyhow, Context, Result};
use owned_ttf_parser::AsFaceRef;
use pdf_gen::id_arena_crate::Id;
use pdf_gen::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::rc::Rc;

/// Body-relative page index of each chapter id and file anchor
pub type PageMap = HashMap<String, usize>;

/// Styled runs waiting to be laid out
pub type Spans = Vec<(String, Colour, SpanFont)>;

/// Chapter headings, matching the HTML output
fn heading_colour() -> Colour {
    Colour::new_rgb_bytes(0x2e, 0x86, 0xc1)
}

fn description_colour() -> Colour {
    Colour::new_rgb_bytes(0x55, 0x55, 0x55)
}

/// Stroke colour of the rule under chapter headings
fn rule_rgb() -> (f32, f32, f32) {
    (0xa3 as f32 / 255.0, 0xc1 as f32 / 255.0, 0xda as f32 / 255.0)
}

/// Offset and thickness of the regular face's underline at `size`
fn underline_metrics(doc: &Document, font_ids: &FontIds, size: Pt) -> (Pt, Pt) {
    let face = doc.fonts[font_ids.regular].face.as_face_ref();
    let scaling = size / face.units_per_em() as f32;
    match face.underline_metrics() {
        Some(metrics) => (
            scaling * metrics.position as f32,
            scaling * metrics.thickness as f32,
        ),
        None => (Pt(-2.0), Pt(0.5)),
    }
}

fn remaining_chars(text: &Spans) -> usize {
    text.iter().map(|(s, _, _)| s.len()).sum()
}

fn page_index(doc: &Document, page_id: Id<Page>) -> Result<usize> {
    doc.index_of_page(page_id)
        .ok_or_else(|| anyhow!("Page was added but isn't in the page order"))
}

/// Lay out the notebook and write it to `out`, returning the page count.
pub fn render(config: &PDF, notebook: &Notebook, out: &mut dyn Write) -> Result<usize> {
    let fonts = LoadedFonts::load(&config.font)
        .with_context(|| format!("Failed to load font '{}'", config.font))?;

    let mut doc = Document::default();
    let font_ids = FontIds {
        regular: doc.add_font(fonts.regular),
        bold: doc.add_font(fonts.bold),
        italic: doc.add_font(fonts.italic),
        bold_italic: doc.add_font(fonts.bold_italic),
    };

    let mut info = Info::default();
    info.title(notebook.title.as_str());
    info.creator(concat!("code-notebook v", env!("CARGO_PKG_VERSION")));
    doc.set_info(info);

    title_page::render(config, &mut doc, &font_ids, notebook)
        .with_context(|| "Failed to render title page")?;

    doc.add_bookmark(None, "Title", 0).borrow_mut().bolded();
    let toc_start = doc.page_order.len();
    doc.add_bookmark(None, "Table of Contents", toc_start)
        .borrow_mut()
        .italicized();

    let mut pages = PageMap::new();
    for chapter in notebook.chapters.iter() {
        let chapter_page = chapter::render(config, &mut doc, &font_ids, chapter)
            .with_context(|| format!("Failed to render chapter {}", chapter.name))?;
        pages.insert(chapter.id(), chapter_page - toc_start);

        let chapter_bookmark = doc.add_bookmark(
            None,
            format!("{}. {}", chapter.number, chapter.name),
            chapter_page,
        );
        chapter_bookmark.borrow_mut().bolded();

        for file in chapter.files.iter() {
            let first_page = source_file::render(config, &mut doc, &font_ids, chapter, file)
                .with_context(|| format!("Failed to render {}/{}", chapter.name, file.name))?;
            pages.insert(file.anchor.to_string(), first_page - toc_start);
            doc.add_bookmark(Some(chapter_bookmark.clone()), file.name.clone(), first_page);
        }
    }

    let entries = table_of_contents::entries(notebook, &pages)?;
    let num_toc_pages = table_of_contents::render(config, &mut doc, &font_ids, toc_start, &entries)
        .with_context(|| "Failed to render table of contents")?;

    // everything after the title and contents bookmarks moved back by the inserted pages
    for entry in doc.outline.entries.iter_mut().skip(2) {
        entry.borrow_mut().page_index += num_toc_pages;
        if !entry.borrow().children.is_empty() {
            offset_bookmark_page_indices(&mut entry.borrow_mut().children, num_toc_pages);
        }
    }

    page_numbers::render(config, &mut doc, &font_ids, toc_start + num_toc_pages);

    let page_count = doc.page_order.len();

    let mut out = BufWriter::new(out);
    doc.write(&mut out).with_context(|| "Failed to render PDF")?;
    out.flush().with_context(|| "Failed to write PDF")?;

    Ok(page_count)
}

fn offset_bookmark_page_indices(items: &mut [Rc<RefCell<OutlineEntry>>], offset_amount: usize) {
    for item in items {
        let has_children = !item.borrow().children.is_empty();
        if has_children {
            offset_bookmark_page_indices(&mut item.borrow_mut().children, offset_amount)
        }
        item.borrow_mut().page_index += offset_amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyntaxTheme;
    use crate::document::NotebookTitle;
    use crate::highlight::Highlighter;
    use indicatif::ProgressBar;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("has parent")).expect("can create dirs");
        fs::write(path, contents).expect("can write file");
    }

    #[test]
    fn renders_a_notebook() {
        let input = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "a.py", b"def f(x):\n    return x * 2\n");
        write(input.path(), "empty.rs", b"");
        write(
            input.path(),
            "pkg/c.go",
            "package pkg\n\nfunc Long() {}\n".repeat(200).as_bytes(),
        );
        write(input.path(), "pkg/README.md", b"Pkg description\nsecond line");

        let tree = crate::walker::walk(input.path()).expect("can walk tree");
        let highlighter = Highlighter::new(SyntaxTheme::default()).expect("can load highlighter");
        let notebook = Notebook::assemble(
            NotebookTitle::new("Rendered"),
            tree,
            &highlighter,
            &ProgressBar::hidden(),
        )
        .expect("can assemble document");

        let mut out = Vec::new();
        let page_count = render(&PDF::default(), &notebook, &mut out).expect("can render PDF");

        // title, contents, two chapter openings, and at least one page per file
        assert!(page_count >= 7, "only {page_count} pages");
        assert!(out.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_fonts_fail_before_writing() {
        let notebook = Notebook {
            title: NotebookTitle::default(),
            chapters: Vec::new(),
            stylesheet: String::new(),
            skipped: Vec::new(),
        };
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = PDF {
            font: dir.path().join("NoSuchFont").display().to_string(),
            ..PDF::default()
        };

        let mut out = Vec::new();
        assert!(render(&config, &notebook, &mut out).is_err());
        assert!(out.is_empty());
    }
}
