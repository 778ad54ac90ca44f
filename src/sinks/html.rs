use crate::document::Document;
use crate::sinks::Render;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Standalone HTML output, the same page the PDF is laid out from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HTML {
    pub outfile: PathBuf,
}

impl Render for HTML {
    fn render(&self, doc: &Document, out: &mut dyn Write) -> Result<Option<usize>> {
        out.write_all(doc.to_html().as_bytes())
            .and_then(|_| out.flush())
            .with_context(|| "Failed to write HTML")?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NotebookTitle;
    use std::io;

    fn document(title: &str) -> Document {
        Document {
            title: NotebookTitle::new(title),
            chapters: Vec::new(),
            stylesheet: String::new(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn writes_the_page() {
        let html = HTML {
            outfile: PathBuf::from("scratch.html"),
        };
        let mut out = Vec::new();

        let page_count = html
            .render(&document("Scratch"), &mut out)
            .expect("can render HTML");

        assert_eq!(page_count, None);
        let written = String::from_utf8(out).expect("output is UTF-8");
        assert!(written.contains("<title>Scratch</title>"));
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn reports_write_failures() {
        let html = HTML {
            outfile: PathBuf::from("out.html"),
        };
        assert!(html.render(&document("Full"), &mut FullDisk).is_err());
    }
}
