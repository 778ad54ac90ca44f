//! Auto-detection of defaults for the config wizard.
//!
//! Probes the notebook input to suggest a title based on its name.

use crate::archive::is_zip;
use std::path::Path;

/// Detect a title from the input's name.
///
/// Directories use their own name (`.` resolves to the working directory) and
/// archives use their file stem. Hyphens and underscores become spaces and every
/// word is capitalised.
pub fn detect_title(input: &Path) -> Option<String> {
    let name = if input.is_file() && is_zip(input) {
        input.file_stem()?.to_str()?.to_string()
    } else {
        let canonical = input.canonicalize().ok()?;
        canonical.file_name()?.to_str()?.to_string()
    };
    title_from_name(&name)
}

fn title_from_name(name: &str) -> Option<String> {
    let title = name
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
