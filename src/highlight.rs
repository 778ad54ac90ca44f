//! Per-file syntax highlighting.
//!
//! Each file is highlighted twice from the same grammar: once into class-based
//! HTML (styled by a single stylesheet generated from the theme), and once into
//! theme-coloured token runs that the PDF layout consumes directly.
//!
//! Highlighting a file never fails the build. Anything that goes wrong comes back
//! as [`FileOutcome::Skipped`] with the reason, and the caller leaves the file out.

use crate::config::SyntaxTheme;
use crate::language::LanguageDetector;
use anyhow::{anyhow, Context, Result};
use content_inspector::ContentType;
use std::fmt;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Class naming for generated markup; every class is prefixed to stay clear of
/// the document's own styles.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "syn-" };

/// Bytes inspected when deciding whether a file is binary.
const BINARY_SAMPLE_SIZE: usize = 8192;

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub colour: (u8, u8, u8),
    pub bold: bool,
    pub italic: bool,
}

impl Token {
    fn from_style(style: Style, text: &str) -> Token {
        Token {
            text: text.to_string(),
            colour: (style.foreground.r, style.foreground.g, style.foreground.b),
            bold: style.font_style.intersects(FontStyle::BOLD),
            italic: style.font_style.intersects(FontStyle::ITALIC),
        }
    }
}

/// A successfully highlighted file.
#[derive(Debug, Clone)]
pub struct Highlighted {
    /// Name of the grammar that was used
    pub syntax: String,
    /// Class-based HTML, wrapped in a `div.highlight > pre`
    pub markup: String,
    /// Styled tokens, one entry per source line (line endings included)
    pub lines: Vec<Vec<Token>>,
}

/// Why a file was left out of the notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file couldn't be read
    Read(String),
    /// The contents don't look like text
    Binary,
    /// No grammar could be picked for the file
    UnknownLanguage,
    /// The highlighter itself failed
    Highlight(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Read(e) => write!(f, "failed to read file: {e}"),
            SkipReason::Binary => write!(f, "binary content"),
            SkipReason::UnknownLanguage => write!(f, "no lexer found for file"),
            SkipReason::Highlight(e) => write!(f, "highlighting failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Highlighted(Highlighted),
    Skipped(SkipReason),
}

pub struct Highlighter {
    ss: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme: SyntaxTheme) -> Result<Highlighter> {
        let ss = two_face::syntax::extra_newlines();
        let mut ts = ThemeSet::load_defaults();
        let theme = ts
            .themes
            .remove(theme.name())
            .ok_or_else(|| anyhow!("Syntax theme `{theme}` isn't available"))?;
        Ok(Highlighter { ss, theme })
    }

    /// CSS rules for every class the generated markup can use.
    pub fn stylesheet(&self) -> Result<String> {
        css_for_theme_with_class_style(&self.theme, CLASS_STYLE)
            .with_context(|| "Failed to generate CSS for syntax theme")
    }

    /// Read and highlight a file from disk.
    pub fn highlight_file(&self, path: &Path, name: &str) -> FileOutcome {
        match std::fs::read(path) {
            Ok(bytes) => self.highlight(name, &bytes),
            Err(e) => FileOutcome::Skipped(SkipReason::Read(e.to_string())),
        }
    }

    /// Highlight raw file contents. Invalid UTF-8 is replaced rather than rejected.
    pub fn highlight(&self, name: &str, bytes: &[u8]) -> FileOutcome {
        let sample = &bytes[..bytes.len().min(BINARY_SAMPLE_SIZE)];
        if content_inspector::inspect(sample) == ContentType::BINARY {
            return FileOutcome::Skipped(SkipReason::Binary);
        }

        let contents = String::from_utf8_lossy(bytes);
        let Some(syntax) = LanguageDetector::new(&self.ss).detect(name, &contents) else {
            return FileOutcome::Skipped(SkipReason::UnknownLanguage);
        };

        match self.render(syntax, &contents) {
            Ok(highlighted) => FileOutcome::Highlighted(highlighted),
            Err(e) => FileOutcome::Skipped(SkipReason::Highlight(format!("{e:#}"))),
        }
    }

    fn render(&self, syntax: &SyntaxReference, contents: &str) -> Result<Highlighted> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.ss, CLASS_STYLE);
        let mut h = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();

        for (i, line) in LinesWithEndings::from(contents).enumerate() {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .with_context(|| format!("Failed to classify line {}", i + 1))?;
            let ranges = h
                .highlight_line(line, &self.ss)
                .with_context(|| format!("Failed to highlight line {}", i + 1))?;
            lines.push(
                ranges
                    .into_iter()
                    .map(|(style, text)| Token::from_style(style, text))
                    .collect(),
            );
        }

        let markup = format!(
            "<div class=\"highlight\"><pre class=\"syn-code\">{}</pre></div>",
            generator.finalize()
        );

        Ok(Highlighted {
            syntax: syntax.name.clone(),
            markup,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter() -> Highlighter {
        Highlighter::new(SyntaxTheme::default()).expect("can load highlighter")
    }

    #[test]
    fn highlights_known_languages() {
        let source = "fn main() {\n    println!(\"<hi>\");\n}\n";
        let outcome = highlighter().highlight("main.rs", source.as_bytes());

        let FileOutcome::Highlighted(highlighted) = outcome else {
            panic!("expected main.rs to be highlighted");
        };
        assert_eq!(highlighted.syntax, "Rust");
        assert_eq!(highlighted.lines.len(), 3);
        assert!(highlighted.markup.starts_with("<div class=\"highlight\">"));
        assert!(highlighted.markup.contains("syn-"));
        // markup must be escaped
        assert!(highlighted.markup.contains("&lt;hi&gt;"));
    }

    #[test]
    fn tokens_preserve_the_text() {
        let source = "def f(x):\n\treturn x  # done\n";
        let FileOutcome::Highlighted(highlighted) = highlighter().highlight("f.py", source.as_bytes())
        else {
            panic!("expected f.py to be highlighted");
        };

        let rebuilt: String = highlighted
            .lines
            .iter()
            .flatten()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn highlights_typescript_projects() {
        let h = highlighter();
        for (name, source) in [
            ("index.ts", "const n: number = 1;\n"),
            ("tsconfig.toml", "[compiler]\nstrict = true\n"),
            ("Dockerfile", "FROM node:20\nCOPY . .\n"),
        ] {
            let outcome = h.highlight(name, source.as_bytes());
            assert!(
                matches!(outcome, FileOutcome::Highlighted(_)),
                "{name} was skipped: {outcome:?}"
            );
        }
    }

    #[test]
    fn skips_binary_files() {
        let bytes = [0u8, 159, 146, 150, 0, 0, 1, 2];
        let outcome = highlighter().highlight("image.rs", &bytes);
        assert!(matches!(outcome, FileOutcome::Skipped(SkipReason::Binary)));
    }

    #[test]
    fn skips_unknown_languages() {
        let outcome = highlighter().highlight("dump.qqq", b"Permission is hereby granted");
        assert!(matches!(
            outcome,
            FileOutcome::Skipped(SkipReason::UnknownLanguage)
        ));
    }

    #[test]
    fn replaces_invalid_utf8() {
        let outcome = highlighter().highlight("notes.txt", b"caf\xe9 au lait\n");
        let FileOutcome::Highlighted(highlighted) = outcome else {
            panic!("expected notes.txt to be highlighted");
        };
        assert!(highlighted.markup.contains("au lait"));
    }

    #[test]
    fn reports_unreadable_files() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let outcome = highlighter().highlight_file(&dir.path().join("missing.rs"), "missing.rs");
        assert!(matches!(outcome, FileOutcome::Skipped(SkipReason::Read(_))));
    }

    #[test]
    fn stylesheet_uses_prefixed_classes() {
        let css = highlighter().stylesheet().expect("can generate stylesheet");
        assert!(css.contains(".syn-"));
    }
}
