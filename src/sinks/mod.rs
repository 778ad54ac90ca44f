use crate::document::{Document, NotebookTitle};
use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

mod html;
pub use html::*;

mod pdf;
pub use pdf::*;

/// What a sink reports back after writing its artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub outfile: PathBuf,
    /// Number of pages, for paginated formats
    pub page_count: Option<usize>,
}

#[derive(Debug)]
pub enum Sink {
    PDF(PDF),
    HTML(HTML),
}

pub trait Render {
    /// Serialize `doc` into `out`, returning the page count for paginated formats.
    fn render(&self, doc: &Document, out: &mut dyn Write) -> Result<Option<usize>>;
}

impl Sink {
    pub fn name(&self) -> &'static str {
        match self {
            Sink::PDF(_) => "PDF",
            Sink::HTML(_) => "HTML",
        }
    }

    /// Where this sink writes for a notebook with the given title
    pub fn outfile(&self, title: &NotebookTitle) -> PathBuf {
        match self {
            Sink::PDF(p) => p.outfile_path(title),
            Sink::HTML(h) => h.outfile.clone(),
        }
    }

    /// Render into a temporary file in `outfile`'s directory. Nothing appears at
    /// `outfile` until the result is persisted.
    pub fn stage(&self, doc: &Document, outfile: &Path) -> Result<StagedOutput> {
        let dir = match outfile.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::Builder::new()
            .prefix(".notebook-")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;

        let page_count = self.render(doc, file.as_file_mut())?;

        Ok(StagedOutput {
            file,
            stats: RenderStats {
                outfile: outfile.to_path_buf(),
                page_count,
            },
        })
    }
}

impl Render for Sink {
    fn render(&self, doc: &Document, out: &mut dyn Write) -> Result<Option<usize>> {
        match self {
            Sink::PDF(p) => p.render(doc, out),
            Sink::HTML(h) => h.render(doc, out),
        }
    }
}

/// A fully written artifact waiting to be moved to its destination.
/// Dropping it removes the temporary file.
pub struct StagedOutput {
    file: NamedTempFile,
    stats: RenderStats,
}

impl StagedOutput {
    pub fn persist(self) -> Result<RenderStats> {
        let outfile = &self.stats.outfile;
        if outfile.exists() {
            info!("Overwriting existing {}", outfile.display());
        }

        // temporary files are created owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(self.file.path(), std::fs::Permissions::from_mode(0o644))
                .with_context(|| format!("Failed to set permissions for {}", outfile.display()))?;
        }

        self.file
            .persist(outfile)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write {}", outfile.display()))?;
        Ok(self.stats)
    }
}
