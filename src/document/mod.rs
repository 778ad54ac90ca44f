//! The assembled notebook.
//!
//! [`Document::assemble`] turns a walked [`Tree`] into numbered chapter sections,
//! highlighting every file on the way. Files that fail to highlight are dropped
//! here, before anything is rendered, so the table of contents and the body are
//! always built from the same list and can't disagree.
//!
//! Chapters are numbered from 1 in sorted order. Each file gets an [`Anchor`]
//! made from its chapter number and its name; a file name repeated in two
//! chapters therefore still gets two distinct anchors.

mod html;

use crate::highlight::{FileOutcome, Highlighted, Highlighter, SkipReason};
use crate::walker::Tree;
use anyhow::Result;
use indicatif::ProgressBar;
use log::{debug, warn};
use std::fmt;
use std::path::PathBuf;

/// Used when the caller supplies no title, or only whitespace.
pub const DEFAULT_TITLE: &str = "My Notebook";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookTitle(String);

impl NotebookTitle {
    /// Blank titles become [`DEFAULT_TITLE`]; anything else is kept verbatim.
    pub fn new<S: AsRef<str>>(title: S) -> NotebookTitle {
        let title = title.as_ref();
        if title.trim().is_empty() {
            NotebookTitle(DEFAULT_TITLE.to_string())
        } else {
            NotebookTitle(title.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NotebookTitle {
    fn default() -> Self {
        NotebookTitle(DEFAULT_TITLE.to_string())
    }
}

impl fmt::Display for NotebookTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Link target shared by a table of contents entry and its file section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor(String);

impl Anchor {
    pub fn new(chapter_number: usize, file_name: &str) -> Anchor {
        Anchor(format!("{chapter_number}-{file_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub anchor: Anchor,
    pub name: String,
    pub path: PathBuf,
    pub highlighted: Highlighted,
}

#[derive(Debug, Clone)]
pub struct ChapterSection {
    /// 1-based position in the sorted chapter list
    pub number: usize,
    pub name: String,
    pub description: Option<String>,
    pub files: Vec<RenderedFile>,
}

impl ChapterSection {
    /// Identifier of the chapter heading in the body
    pub fn id(&self) -> String {
        format!("chapter{}", self.number)
    }

    /// The description, if there is one with any text in it
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.is_empty())
    }
}

/// A file left out of the notebook, and why.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub chapter: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub title: NotebookTitle,
    pub chapters: Vec<ChapterSection>,
    /// Syntax theme CSS, generated once for the whole document
    pub stylesheet: String,
    pub skipped: Vec<SkippedFile>,
}

impl Document {
    /// Highlight every file in `tree` and arrange the results into chapters.
    ///
    /// The progress bar is advanced once per file, highlighted or not.
    pub fn assemble(
        title: NotebookTitle,
        tree: Tree,
        highlighter: &Highlighter,
        progress: &ProgressBar,
    ) -> Result<Document> {
        let stylesheet = highlighter.stylesheet()?;
        let mut chapters = Vec::with_capacity(tree.chapters.len());
        let mut skipped = Vec::new();

        for (i, (key, chapter)) in tree.chapters.into_iter().enumerate() {
            let number = i + 1;
            let mut files = Vec::with_capacity(chapter.files.len());

            for entry in chapter.files.into_iter() {
                progress.set_message(entry.name.clone());
                match highlighter.highlight_file(&entry.path, &entry.name) {
                    FileOutcome::Highlighted(highlighted) => {
                        debug!("Highlighted {} as {}", entry.path.display(), highlighted.syntax);
                        files.push(RenderedFile {
                            anchor: Anchor::new(number, &entry.name),
                            name: entry.name,
                            path: entry.path,
                            highlighted,
                        });
                    }
                    FileOutcome::Skipped(reason) => {
                        warn!("Skipping {}/{}: {reason}", key.name, entry.name);
                        skipped.push(SkippedFile {
                            chapter: key.name.clone(),
                            path: entry.path,
                            reason,
                        });
                    }
                }
                progress.inc(1);
            }

            chapters.push(ChapterSection {
                number,
                name: key.name,
                description: chapter.description,
                files,
            });
        }

        Ok(Document {
            title,
            chapters,
            stylesheet,
            skipped,
        })
    }

    /// Number of files that made it into the notebook
    pub fn file_count(&self) -> usize {
        self.chapters.iter().map(|c| c.files.len()).sum()
    }
}
