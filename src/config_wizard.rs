//! Interactive configuration wizard for creating `notebook.toml`.
//!
//! The wizard suggests a title from the input's name, then collects the syntax
//! theme and the PDF and HTML output options through a series of prompts.

use crate::config::{Configuration, SyntaxTheme};
use crate::detection::detect_title;
use crate::document::NotebookTitle;
use crate::output::secure_file_stem;
use crate::sinks::{DEFAULT_FONT, HTML, PDF};
use anyhow::{anyhow, Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};
use std::path::{Path, PathBuf};

/// Run the interactive configuration wizard.
///
/// Prompts for the notebook title, theme, and outputs, then writes
/// `notebook.toml` to the current directory.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };

    let input: String = Input::with_theme(&theme)
        .with_prompt("Folder or .zip archive you'll be rendering")
        .default(".".to_string())
        .interact()
        .with_context(|| "Failed to obtain input path")?;
    let input = PathBuf::from(input);
    if !input.exists() {
        return Err(anyhow!("Path '{}' doesn't exist!", input.display()));
    }

    let title: String = Input::with_theme(&theme)
        .with_prompt("Notebook title")
        .with_initial_text(detect_title(&input).unwrap_or_default())
        .allow_empty(true)
        .interact()
        .with_context(|| "Failed to obtain title")?;
    let notebook_title = NotebookTitle::new(&title);

    let syntax_theme = FuzzySelect::with_theme(&theme)
        .with_prompt("Syntax highlighting theme")
        .items(SyntaxTheme::all())
        .default(0)
        .interact()?;
    let syntax_theme = SyntaxTheme::all()[syntax_theme];

    let mut pdf = PDF::default();
    if Confirm::with_theme(&theme)
        .with_prompt("Do you want to render to PDF?")
        .default(true)
        .interact()?
    {
        let stem = secure_file_stem(notebook_title.as_str());
        let outfile: String = Input::with_theme(&theme)
            .with_prompt("Output pdf file")
            .default(format!("{stem}.pdf"))
            .interact()?;
        pdf.outfile = Some(with_extension(PathBuf::from(outfile), "pdf"));

        pdf.font = Input::with_theme(&theme)
            .with_prompt(format!(
                "Font family ({DEFAULT_FONT} is bundled, or a path without the -Regular.ttf suffix)"
            ))
            .default(pdf.font.clone())
            .validate_with(|font: &String| {
                if font == DEFAULT_FONT {
                    return Ok(());
                }
                let candidates = [
                    font.clone(),
                    format!("{font}.ttf"),
                    format!("{font}-Regular.ttf"),
                ];
                if candidates.iter().any(|p| Path::new(p).is_file()) {
                    Ok(())
                } else {
                    Err("No font files found for that family")
                }
            })
            .interact()?;

        let base_font_size: f32 = Input::with_theme(&theme)
            .with_prompt("Base font size in points")
            .default(9.0)
            .interact()?;

        // derived sizes keep the default proportions, rounded to half points
        let scaled = |ratio: f32| (base_font_size * ratio * 2.0).round() / 2.0;
        pdf.font_size_title_pt = scaled(28.0 / 9.0);
        pdf.font_size_heading_pt = scaled(2.0);
        pdf.font_size_subheading_pt = scaled(10.0 / 9.0);
        pdf.font_size_body_pt = scaled(1.0);
        pdf.font_size_small_pt = scaled(7.0 / 9.0);
    } else {
        pdf.enabled = false;
    }

    let wants_html = !pdf.enabled
        || Confirm::with_theme(&theme)
            .with_prompt("Do you also want a standalone HTML page?")
            .default(false)
            .interact()?;
    let html = if wants_html {
        let stem = secure_file_stem(notebook_title.as_str());
        let outfile: String = Input::with_theme(&theme)
            .with_prompt("Output html file")
            .default(format!("{stem}.html"))
            .interact()?;
        Some(HTML {
            outfile: with_extension(PathBuf::from(outfile), "html"),
        })
    } else {
        None
    };

    let config = Configuration {
        title: if title.trim().is_empty() {
            None
        } else {
            Some(title)
        },
        theme: syntax_theme,
        pdf,
        html,
    };

    let config =
        toml::to_string_pretty(&config).with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = PathBuf::from(Configuration::FILE_NAME);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{} already exists, do you want to override it?",
                Configuration::FILE_NAME
            ))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write(&config_path, config)
            .with_context(|| "Failed to write configuration file")?;
        println!("{} written!", Configuration::FILE_NAME);
    }

    Ok(())
}

/// Force `ext` onto `path`, case-insensitively keeping one that's already there.
fn with_extension(mut path: PathBuf, ext: &str) -> PathBuf {
    let current = path
        .extension()
        .map(std::ffi::OsStr::to_ascii_lowercase)
        .unwrap_or_default();
    if current != *ext {
        path.set_extension(ext);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forces_output_extensions() {
        assert_eq!(
            with_extension(PathBuf::from("notes"), "pdf"),
            PathBuf::from("notes.pdf")
        );
        assert_eq!(
            with_extension(PathBuf::from("notes.PDF"), "pdf"),
            PathBuf::from("notes.PDF")
        );
        assert_eq!(
            with_extension(PathBuf::from("notes.txt"), "html"),
            PathBuf::from("notes.html")
        );
    }
}
