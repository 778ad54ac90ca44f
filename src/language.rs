//! Best-guess grammar detection.
//!
//! The file extension is the primary signal. A handful of extensions are shared by
//! several languages; for those the file contents break the tie. Files without a
//! usable extension fall back to their whole name (`Makefile`, `Dockerfile`, ...)
//! and finally to first-line detection (shebangs, XML prologs, modelines).
//!
//! Grammars come from the extended set bundled by `two-face` (the one `bat`
//! ships), which covers TypeScript, Kotlin, Swift, TOML, Dockerfiles and the like
//! on top of syntect's defaults.
//!
//! Guessing wrong is fine. Only a total failure to pick a grammar makes the caller
//! skip the file.

use syntect::parsing::{SyntaxReference, SyntaxSet};

/// An extension claimed by more than one grammar.
struct Ambiguity {
    extension: &'static str,
    /// Grammars tried in order; the first whose markers appear in the contents wins
    candidates: &'static [(&'static str, &'static [&'static str])],
    /// Grammar used when no candidate's markers match
    fallback: &'static str,
}

const AMBIGUOUS_EXTENSIONS: &[Ambiguity] = &[
    Ambiguity {
        extension: "h",
        candidates: &[(
            "C++",
            &[
                "namespace ",
                "template<",
                "template <",
                "std::",
                "public:",
                "private:",
                "class ",
            ],
        )],
        fallback: "C",
    },
    Ambiguity {
        extension: "m",
        candidates: &[
            (
                "Objective-C",
                &["@interface", "@implementation", "@end", "#import", "#include"],
            ),
            (
                "MATLAB",
                &["function ", "endfunction", "disp(", "fprintf(", "zeros(", ".^", "%%"],
            ),
        ],
        fallback: "Objective-C",
    },
];

pub struct LanguageDetector<'a> {
    ss: &'a SyntaxSet,
}

impl<'a> LanguageDetector<'a> {
    pub fn new(ss: &'a SyntaxSet) -> LanguageDetector<'a> {
        LanguageDetector { ss }
    }

    /// Guess the grammar for a file, or `None` if nothing fits.
    pub fn detect(&self, file_name: &str, contents: &str) -> Option<&'a SyntaxReference> {
        self.by_extension(file_name, contents)
            .or_else(|| self.ss.find_syntax_by_extension(file_name))
            .or_else(|| self.by_first_line(contents))
    }

    fn by_extension(&self, file_name: &str, contents: &str) -> Option<&'a SyntaxReference> {
        let (_, extension) = file_name.rsplit_once('.')?;
        if extension.is_empty() {
            return None;
        }

        if let Some(ambiguity) = AMBIGUOUS_EXTENSIONS
            .iter()
            .find(|a| a.extension.eq_ignore_ascii_case(extension))
        {
            if let Some(syntax) = self.break_tie(ambiguity, contents) {
                return Some(syntax);
            }
        }

        self.ss.find_syntax_by_extension(extension).or_else(|| {
            self.ss
                .find_syntax_by_extension(&extension.to_ascii_lowercase())
        })
    }

    fn break_tie(&self, ambiguity: &Ambiguity, contents: &str) -> Option<&'a SyntaxReference> {
        ambiguity
            .candidates
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| contents.contains(m)))
            .and_then(|(name, _)| self.ss.find_syntax_by_name(name))
            .or_else(|| self.ss.find_syntax_by_name(ambiguity.fallback))
    }

    fn by_first_line(&self, contents: &str) -> Option<&'a SyntaxReference> {
        let first_line = contents.lines().next()?;
        self.ss.find_syntax_by_first_line(first_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(file_name: &str, contents: &str) -> Option<String> {
        let ss = two_face::syntax::extra_newlines();
        let detector = LanguageDetector::new(&ss);
        detector
            .detect(file_name, contents)
            .map(|syntax| syntax.name.clone())
    }

    #[test]
    fn detects_by_extension() {
        assert_eq!(detect("main.rs", "fn main() {}").as_deref(), Some("Rust"));
        assert_eq!(detect("a.py", "print(1)").as_deref(), Some("Python"));
        assert_eq!(detect("c.go", "package pkg").as_deref(), Some("Go"));
        assert_eq!(detect("b.md", "# b").as_deref(), Some("Markdown"));
    }

    #[test]
    fn extension_lookup_ignores_case_as_fallback() {
        assert_eq!(detect("SCRIPT.PY", "print(1)").as_deref(), Some("Python"));
    }

    #[test]
    fn headers_use_contents_to_break_ties() {
        assert_eq!(
            detect("thing.h", "namespace foo { class Bar {}; }").as_deref(),
            Some("C++")
        );
        assert_eq!(
            detect("thing.h", "int add(int a, int b);").as_deref(),
            Some("C")
        );
    }

    #[test]
    fn detects_common_project_files() {
        assert_eq!(
            detect("app.ts", "export const x: number = 1;").as_deref(),
            Some("TypeScript")
        );
        assert_eq!(
            detect("Cargo.toml", "[package]\nname = \"x\"\n").as_deref(),
            Some("TOML")
        );
        assert_eq!(detect("Main.kt", "fun main() {}").as_deref(), Some("Kotlin"));
        assert_eq!(
            detect("main.swift", "print(\"hi\")").as_deref(),
            Some("Swift")
        );
        assert!(detect("App.tsx", "export default () => <div/>;").is_some());
        assert!(detect("style.scss", "$c: red;\na { color: $c; }").is_some());
    }

    #[test]
    fn objective_c_and_matlab_share_m() {
        assert_eq!(
            detect("View.m", "#import <UIKit/UIKit.h>\n@implementation View\n@end\n").as_deref(),
            Some("Objective-C")
        );
        assert_eq!(
            detect("solve.m", "function y = solve(x)\n  y = x.^2;\nend\n").as_deref(),
            Some("MATLAB")
        );
    }

    #[test]
    fn detects_by_whole_file_name() {
        assert_eq!(
            detect("Makefile", "all:\n\techo hi\n").as_deref(),
            Some("Makefile")
        );
        let dockerfile = detect("Dockerfile", "FROM rust:1\nRUN cargo build\n");
        assert!(
            dockerfile.as_deref().is_some_and(|name| name.contains("Dockerfile")),
            "got {dockerfile:?}"
        );
    }

    #[test]
    fn detects_by_shebang() {
        assert_eq!(
            detect("run", "#!/usr/bin/env python\nprint(1)\n").as_deref(),
            Some("Python")
        );
    }

    #[test]
    fn gives_up_on_unknown_files() {
        assert_eq!(detect("blob.zzzz", "????"), None);
        assert_eq!(detect("dump.qqq", "Permission is hereby granted"), None);
    }
}
