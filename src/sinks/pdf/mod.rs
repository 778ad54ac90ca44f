mod config;
pub use config::*;

mod fonts;
mod rendering;

use crate::document::Document;
use crate::sinks::Render;
use anyhow::Result;
use std::io::Write;

impl Render for PDF {
    fn render(&self, doc: &Document, out: &mut dyn Write) -> Result<Option<usize>> {
        let page_count = rendering::render(self, doc, out)?;
        Ok(Some(page_count))
    }
}
