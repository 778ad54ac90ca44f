//! Directory traversal and chapter partitioning.
//!
//! Every folder under the root (the root included) becomes one chapter. Files are
//! grouped under the folder that directly contains them and sorted by name, so the
//! walk order of the filesystem never leaks into the notebook.
//!
//! A folder may carry a free-text description in one of the
//! [`RESERVED_DESCRIPTION_FILES`]. The list is scanned in priority order and only the
//! first file present is read; every reserved name is kept out of the file list
//! whether it was used or not.
//!
//! Symbolic links are never followed into directories, which keeps the walk free of
//! cycles. Links that resolve to regular files are treated like any other file.

use anyhow::{anyhow, Result};
use ignore::WalkBuilder;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Chapter name given to the top of the tree.
pub const ROOT_CHAPTER: &str = "Root";

/// Description file names, highest priority first. Matching is case-sensitive.
pub const RESERVED_DESCRIPTION_FILES: &[&str] = &["README.md", "README.txt", "description.txt"];

/// Identifies a chapter. Ordering is by display name, falling back to the relative
/// path so that a folder literally called `Root` sorts after the real root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterKey {
    pub name: String,
    pub relative: PathBuf,
}

impl ChapterKey {
    fn new(root: &Path, dir: &Path) -> ChapterKey {
        let relative = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();
        let name = if relative.as_os_str().is_empty() {
            ROOT_CHAPTER.to_string()
        } else {
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<String>>()
                .join("/")
        };
        ChapterKey { name, relative }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Location of the file on disk
    pub path: PathBuf,
    /// Base name shown in the notebook
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Chapter {
    pub files: Vec<FileEntry>,
    pub description: Option<String>,
}

/// The walked tree: every chapter, ordered by [`ChapterKey`].
#[derive(Debug, Default)]
pub struct Tree {
    pub chapters: BTreeMap<ChapterKey, Chapter>,
}

impl Tree {
    /// Total number of files across all chapters
    pub fn file_count(&self) -> usize {
        self.chapters.values().map(|c| c.files.len()).sum()
    }

    /// Look up a chapter by its display name
    #[cfg(test)]
    pub fn chapter(&self, name: &str) -> Option<&Chapter> {
        self.chapters
            .iter()
            .find(|(key, _)| key.name == name)
            .map(|(_, chapter)| chapter)
    }
}

/// Walk `root`, producing one chapter per directory.
///
/// Individual entries that can't be read are logged and skipped; the only hard error
/// is a root that isn't a directory.
pub fn walk(root: &Path) -> Result<Tree> {
    if !root.is_dir() {
        return Err(anyhow!("Input path {} isn't a directory!", root.display()));
    }

    let mut tree = Tree::default();
    // reserved files seen per chapter, as (priority, path)
    let mut reserved: HashMap<ChapterKey, Vec<(usize, PathBuf)>> = HashMap::new();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();

        if file_type.is_dir() {
            tree.chapters
                .entry(ChapterKey::new(root, path))
                .or_default();
            continue;
        }

        if file_type.is_symlink() && path.is_dir() {
            debug!("Not following directory link {}", path.display());
            continue;
        }
        if !path.is_file() {
            debug!("Ignoring special file {}", path.display());
            continue;
        }

        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        let key = ChapterKey::new(root, path.parent().unwrap_or(root));

        if let Some(priority) = RESERVED_DESCRIPTION_FILES.iter().position(|r| *r == name) {
            reserved
                .entry(key)
                .or_default()
                .push((priority, path.to_path_buf()));
            continue;
        }

        debug!("Found {}", path.display());
        tree.chapters.entry(key).or_default().files.push(FileEntry {
            path: path.to_path_buf(),
            name,
        });
    }

    for chapter in tree.chapters.values_mut() {
        chapter.files.sort_by(|a, b| a.name.cmp(&b.name));
    }

    for (key, mut candidates) in reserved.into_iter() {
        candidates.sort_by_key(|(priority, _)| *priority);
        let Some((_, path)) = candidates.into_iter().next() else {
            continue;
        };
        let description = read_description(&path);
        tree.chapters.entry(key).or_default().description = description;
    }

    Ok(tree)
}

/// Read a description file, dropping invalid UTF-8 rather than failing.
fn read_description(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).trim().to_string()),
        Err(e) => {
            warn!("Failed to read description {}: {e}", path.display());
            None
        }
    }
}
