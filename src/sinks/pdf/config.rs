use crate::document::NotebookTitle;
use crate::output::download_name;
use crate::sinks::pdf::fonts::BUNDLED_FONT;
use pdf_gen::layout::Margins;
use pdf_gen::{In, Pt};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FONT: &str = BUNDLED_FONT;

/// PDF output configuration.
///
/// Every key has a default, so a `[pdf]` table only needs the values it changes.
/// The default page is A4 with a small binding gutter on the inner edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PDF {
    /// Set to false to only produce the HTML output
    pub enabled: bool,
    /// Output PDF file path; derived from the title when missing
    pub outfile: Option<PathBuf>,
    /// `DejaVuSansMono` for the bundled font, otherwise a path to a font family
    /// without the `-Regular.ttf` style suffix, or to a single .ttf
    pub font: String,
    /// Page width in inches
    pub page_width_in: f32,
    /// Page height in inches
    pub page_height_in: f32,
    /// Top margin in inches (room for the running header)
    pub margin_top_in: f32,
    /// Left and right margins in inches
    pub margin_side_in: f32,
    /// Bottom margin in inches (room for the page number)
    pub margin_bottom_in: f32,
    /// Extra space on the binding edge, alternating sides
    pub gutter_in: f32,
    pub font_size_title_pt: f32,
    pub font_size_heading_pt: f32,
    pub font_size_subheading_pt: f32,
    pub font_size_body_pt: f32,
    pub font_size_small_pt: f32,
}

impl Default for PDF {
    fn default() -> Self {
        PDF {
            enabled: true,
            outfile: None,
            font: DEFAULT_FONT.to_string(),
            page_width_in: 8.27,
            page_height_in: 11.69,
            margin_top_in: 0.75,
            margin_side_in: 0.5,
            margin_bottom_in: 0.75,
            gutter_in: 0.25,
            font_size_title_pt: 28.0,
            font_size_heading_pt: 18.0,
            font_size_subheading_pt: 10.0,
            font_size_body_pt: 9.0,
            font_size_small_pt: 7.0,
        }
    }
}

impl PDF {
    pub fn page_size(&self) -> (Pt, Pt) {
        (
            In(self.page_width_in).into(),
            In(self.page_height_in).into(),
        )
    }

    /// Margins for the page that will land at `page_index`
    pub fn margins(&self, page_index: usize) -> Margins {
        Margins::trbl(
            In(self.margin_top_in).into(),
            In(self.margin_side_in).into(),
            In(self.margin_bottom_in).into(),
            In(self.margin_side_in).into(),
        )
        .with_gutter(In(self.gutter_in).into(), page_index)
    }

    pub fn outfile_path(&self, title: &NotebookTitle) -> PathBuf {
        self.outfile
            .clone()
            .unwrap_or_else(|| PathBuf::from(download_name(title)))
    }
}
