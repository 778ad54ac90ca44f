//! The notebook build pipeline: open the input, walk it, highlight and assemble
//! the document, then hand it to every configured sink.

use crate::archive::InputTree;
use crate::config::Configuration;
use crate::document::{Document, NotebookTitle, SkippedFile};
use crate::highlight::Highlighter;
use crate::sinks::{RenderStats, StagedOutput};
use crate::walker;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::info;
use std::path::Path;

/// What a finished build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub title: NotebookTitle,
    pub chapter_count: usize,
    pub file_count: usize,
    pub skipped: Vec<SkippedFile>,
    pub outputs: Vec<RenderStats>,
}

/// Build a notebook from `input`, a directory or `.zip` archive.
///
/// Files that can't be highlighted are left out and listed in the report; any
/// other failure aborts the build. Outputs are moved into place only once every
/// sink has rendered, so a failed build leaves no files behind. The progress
/// bar's length is set once the number of files is known.
pub fn generate_notebook(
    input: &Path,
    config: &Configuration,
    progress: &ProgressBar,
) -> Result<BuildReport> {
    let sinks = config.sinks()?;

    let input = InputTree::open(input)?;
    let tree = walker::walk(input.root())
        .with_context(|| format!("Failed to walk {}", input.root().display()))?;
    info!(
        "Found {} files in {} folders",
        tree.file_count(),
        tree.chapters.len()
    );
    progress.set_length(tree.file_count() as u64);

    let highlighter = Highlighter::new(config.theme)?;
    let title = NotebookTitle::new(config.title.as_deref().unwrap_or_default());
    let doc = Document::assemble(title, tree, &highlighter, progress)?;
    progress.finish_with_message("Files highlighted");

    let mut staged = Vec::with_capacity(sinks.len());
    for sink in sinks.iter() {
        let outfile = sink.outfile(&doc.title);
        info!("Rendering {} to {}", sink.name(), outfile.display());
        staged.push(
            sink.stage(&doc, &outfile)
                .with_context(|| format!("Failed to render {} output", sink.name()))?,
        );
    }
    let outputs = staged
        .into_iter()
        .map(StagedOutput::persist)
        .collect::<Result<Vec<_>>>()?;

    Ok(BuildReport {
        chapter_count: doc.chapters.len(),
        file_count: doc.file_count(),
        title: doc.title,
        skipped: doc.skipped,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{HTML, PDF};
    use std::fs;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("has parent")).expect("can create dirs");
        fs::write(path, contents).expect("can write file");
    }

    fn html_only(outfile: PathBuf) -> Configuration {
        Configuration {
            pdf: PDF {
                enabled: false,
                ..PDF::default()
            },
            html: Some(HTML { outfile }),
            ..Configuration::default()
        }
    }

    #[test]
    fn builds_a_notebook_end_to_end() {
        let input = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "a.py", b"print('a')\n");
        write(input.path(), "b.md", b"# b\n");
        write(input.path(), "pkg/c.go", b"package pkg\n");
        write(input.path(), "pkg/README.md", b"Pkg description\n");

        let output = tempfile::tempdir().expect("can create temp dir");
        let outfile = output.path().join("notebook.html");
        let config = html_only(outfile.clone());

        let report = generate_notebook(input.path(), &config, &ProgressBar::hidden())
            .expect("can build notebook");

        assert_eq!(report.title.as_str(), "My Notebook");
        assert_eq!(report.chapter_count, 2);
        assert_eq!(report.file_count, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.outputs[0].outfile, outfile);

        let html = fs::read_to_string(&outfile).expect("can read output");
        assert!(html.contains(">1. Root<"));
        assert!(html.contains(">2. pkg<"));
        assert!(html.contains("<p class=\"description\">Pkg description</p>"));
        for anchor in ["1-a.py", "1-b.md", "2-c.go"] {
            assert!(html.contains(&format!("href=\"#{anchor}\"")), "no link to {anchor}");
            assert!(html.contains(&format!("id=\"{anchor}\"")), "no target {anchor}");
        }
        // README.md is the description, never a listed file
        assert!(!html.contains("id=\"2-README.md\""));
    }

    #[test]
    fn reports_skipped_files() {
        let input = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "main.rs", b"fn main() {}\n");
        write(input.path(), "data.bin", &[0, 0, 0, 1, 2, 3]);

        let output = tempfile::tempdir().expect("can create temp dir");
        let mut config = html_only(output.path().join("out.html"));
        config.title = Some("Skips".to_string());

        let report = generate_notebook(input.path(), &config, &ProgressBar::hidden())
            .expect("can build notebook");

        assert_eq!(report.file_count, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].chapter, "Root");
    }

    #[test]
    fn fails_without_outputs() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let config = Configuration {
            pdf: PDF {
                enabled: false,
                ..PDF::default()
            },
            ..Configuration::default()
        };
        assert!(generate_notebook(input.path(), &config, &ProgressBar::hidden()).is_err());
    }

    #[test]
    fn failed_outputs_discard_the_others() {
        let input = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "main.rs", b"fn main() {}\n");

        let output = tempfile::tempdir().expect("can create temp dir");
        let pdf = output.path().join("notes.pdf");
        let config = Configuration {
            pdf: PDF {
                outfile: Some(pdf.clone()),
                ..PDF::default()
            },
            html: Some(HTML {
                outfile: output.path().join("missing").join("notes.html"),
            }),
            ..Configuration::default()
        };

        assert!(generate_notebook(input.path(), &config, &ProgressBar::hidden()).is_err());
        assert!(!pdf.exists());
        let leftovers: Vec<_> = fs::read_dir(output.path())
            .expect("can list output")
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn writes_every_output() {
        let input = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "main.rs", b"fn main() {}\n");

        let output = tempfile::tempdir().expect("can create temp dir");
        let pdf = output.path().join("notes.pdf");
        let html = output.path().join("notes.html");
        let config = Configuration {
            pdf: PDF {
                outfile: Some(pdf.clone()),
                ..PDF::default()
            },
            html: Some(HTML {
                outfile: html.clone(),
            }),
            ..Configuration::default()
        };

        let report = generate_notebook(input.path(), &config, &ProgressBar::hidden())
            .expect("can build notebook");

        assert_eq!(report.outputs.len(), 2);
        assert!(report.outputs[0].page_count.is_some());
        assert!(fs::read(&pdf).expect("can read PDF").starts_with(b"%PDF"));
        assert!(html.exists());
    }

    #[test]
    fn fails_on_missing_input() {
        let output = tempfile::tempdir().expect("can create temp dir");
        let config = html_only(output.path().join("out.html"));
        let missing = output.path().join("no-such-dir");
        assert!(generate_notebook(&missing, &config, &ProgressBar::hidden()).is_err());
        assert!(!output.path().join("out.html").exists());
    }
}
