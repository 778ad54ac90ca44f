use super::{ChapterSection, Document, RenderedFile};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

/// Page styles. The syntax theme's own rules are appended after these.
const BASE_CSS: &str = r#"
body {
    font-family: "DejaVu Sans Mono", monospace;
    font-size: 12px;
    margin: 2em;
}
h1 {
    text-align: center;
    margin-bottom: 1.5em;
}
h2 {
    color: #2e86c1;
    border-bottom: 1px solid #a3c1da;
    padding-bottom: 0.2em;
    margin-top: 2em;
}
h3 {
    margin-top: 1.5em;
}
nav ol {
    list-style: none;
    padding-left: 0;
}
nav ol ol {
    padding-left: 2em;
}
nav a {
    text-decoration: none;
    color: inherit;
}
p.description {
    font-style: italic;
    color: #555;
    white-space: pre-line;
}
.highlight pre {
    white-space: pre-wrap;
    word-wrap: break-word;
    background-color: #f8f8f8;
    padding: 0.5em;
    border-radius: 4px;
}
"#;

impl Document {
    /// Serialize the notebook as one self-contained HTML page.
    ///
    /// Every table of contents link points at an element id emitted in the body,
    /// and the body contains exactly the files listed in the table of contents.
    pub fn to_html(&self) -> String {
        let title = encode_text(self.title.as_str());
        let mut out = String::new();

        // writing into a String can't fail
        let _ = writeln!(out, "<!DOCTYPE html>");
        let _ = writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">");
        let _ = writeln!(out, "<title>{title}</title>");
        let _ = writeln!(out, "<style>{BASE_CSS}\n{}</style>", self.stylesheet);
        let _ = writeln!(out, "</head>\n<body>");
        let _ = writeln!(out, "<h1>{title}</h1>");

        self.write_toc(&mut out);
        for chapter in self.chapters.iter() {
            write_chapter(&mut out, chapter);
        }

        let _ = writeln!(out, "</body>\n</html>");
        out
    }

    fn write_toc(&self, out: &mut String) {
        let _ = writeln!(out, "<nav>\n<h2>Table of Contents</h2>\n<ol>");
        for chapter in self.chapters.iter() {
            let _ = write!(
                out,
                "<li><a href=\"#{}\">{}. {}</a>",
                chapter.id(),
                chapter.number,
                encode_text(&chapter.name)
            );
            if !chapter.files.is_empty() {
                let _ = writeln!(out, "\n<ol>");
                for file in chapter.files.iter() {
                    let _ = writeln!(
                        out,
                        "<li><a href=\"#{}\">{}</a></li>",
                        encode_double_quoted_attribute(file.anchor.as_str()),
                        encode_text(&file.name)
                    );
                }
                let _ = writeln!(out, "</ol>");
            }
            let _ = writeln!(out, "</li>");
        }
        let _ = writeln!(out, "</ol>\n</nav>");
    }
}

fn write_chapter(out: &mut String, chapter: &ChapterSection) {
    let _ = writeln!(
        out,
        "<section>\n<h2 id=\"{}\">{}. {}</h2>",
        chapter.id(),
        chapter.number,
        encode_text(&chapter.name)
    );
    if let Some(description) = chapter.description_text() {
        let _ = writeln!(
            out,
            "<p class=\"description\">{}</p>",
            encode_text(description)
        );
    }
    for file in chapter.files.iter() {
        write_file(out, file);
    }
    let _ = writeln!(out, "</section>");
}

fn write_file(out: &mut String, file: &RenderedFile) {
    let _ = writeln!(
        out,
        "<h3 id=\"{}\">{}</h3>",
        encode_double_quoted_attribute(file.anchor.as_str()),
        encode_text(&file.name)
    );
    let _ = writeln!(out, "{}", file.highlighted.markup);
}
