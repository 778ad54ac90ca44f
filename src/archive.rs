//! Notebook input: a directory used in place, or a `.zip` extracted into a
//! scratch directory owned by the build.
//!
//! The scratch directory is removed when the [`InputTree`] is dropped, whichever
//! way the build ends.

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory that lives exactly as long as one build.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> Result<ScratchDir> {
        let dir = tempfile::Builder::new()
            .prefix("notebook-")
            .tempdir()
            .with_context(|| "Failed to create scratch directory")?;
        debug!("Created scratch directory {}", dir.path().display());
        Ok(ScratchDir { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[derive(Debug)]
pub enum InputTree {
    Directory(PathBuf),
    Extracted(ScratchDir),
}

impl InputTree {
    /// Open `path` as a notebook source tree.
    pub fn open(path: &Path) -> Result<InputTree> {
        if path.is_dir() {
            return Ok(InputTree::Directory(path.to_path_buf()));
        }
        if path.is_file() && is_zip(path) {
            let scratch = ScratchDir::new()?;
            extract_zip(path, scratch.path())?;
            return Ok(InputTree::Extracted(scratch));
        }
        if !path.exists() {
            return Err(anyhow!("Input path {} doesn't exist!", path.display()));
        }
        Err(anyhow!(
            "Input path {} must be a directory or a .zip archive",
            path.display()
        ))
    }

    /// Root directory to walk
    pub fn root(&self) -> &Path {
        match self {
            InputTree::Directory(path) => path,
            InputTree::Extracted(scratch) => scratch.path(),
        }
    }
}

pub fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

/// Extract every entry of the archive under `dest`. Entries that would land
/// outside `dest` make the whole extraction fail.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("Failed to read {} as a zip archive", archive.display()))?;
    info!(
        "Extracting {} entries from {}",
        zip.len(),
        archive.display()
    );
    zip.extract(dest)
        .with_context(|| format!("Failed to extract {}", archive.display()))?;
    Ok(())
}
