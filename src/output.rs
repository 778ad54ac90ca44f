//! Output file naming.
//!
//! Titles are free text; file names are not. The title is reduced to a
//! conservative ASCII stem that is safe on every common filesystem.

use crate::document::NotebookTitle;
use unicode_normalization::UnicodeNormalization;

/// Used when nothing of the title survives sanitizing.
pub const FALLBACK_STEM: &str = "notebook";

/// Reduce `title` to a file name stem made of `[A-Za-z0-9_.-]`.
///
/// Accented letters lose their accents, other non-ASCII characters are dropped,
/// path separators and whitespace runs become single underscores, and leading or
/// trailing dots and underscores are stripped.
pub fn secure_file_stem(title: &str) -> String {
    let ascii: String = title.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<&str>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let stem = kept.trim_matches(|c| c == '.' || c == '_');

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// The PDF file name offered for a notebook with this title.
pub fn download_name(title: &NotebookTitle) -> String {
    format!("{}.pdf", secure_file_stem(title.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_titles() {
        assert_eq!(
            download_name(&NotebookTitle::new("My cool/notebook!")),
            "My_cool_notebook.pdf"
        );
        assert_eq!(download_name(&NotebookTitle::new("")), "My_Notebook.pdf");
    }

    #[test]
    fn strips_accents_and_traversal() {
        assert_eq!(secure_file_stem("Café Déjà vu"), "Cafe_Deja_vu");
        assert_eq!(secure_file_stem("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_file_stem("  .hidden_ "), "hidden");
    }

    #[test]
    fn falls_back_when_nothing_survives() {
        assert_eq!(secure_file_stem("日本語"), FALLBACK_STEM);
        assert_eq!(secure_file_stem("!!!"), FALLBACK_STEM);
    }
}
