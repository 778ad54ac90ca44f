//! `notebook.toml` configuration.
//!
//! Every key is optional: a missing file, or a file that only sets a title, still
//! yields a complete configuration that renders a PDF named after the title.
//! Command-line flags are applied on top via [`Configuration::apply_overrides`].

use crate::sinks::{Sink, HTML, PDF};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Syntax highlighting themes bundled with syntect that print well on white paper.
#[derive(
    Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug, Default, clap::ValueEnum,
)]
pub enum SyntaxTheme {
    #[default]
    #[serde(rename = "InspiredGitHub")]
    #[value(name = "inspired-github")]
    InspiredGitHub,
    #[serde(rename = "Solarized (light)")]
    #[value(name = "solarized-light")]
    SolarizedLight,
    #[serde(rename = "base16-ocean.light")]
    #[value(name = "ocean-light")]
    OceanLight,
}

impl fmt::Display for SyntaxTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl SyntaxTheme {
    /// The key of this theme in syntect's default theme set
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxTheme::InspiredGitHub => "InspiredGitHub",
            SyntaxTheme::SolarizedLight => "Solarized (light)",
            SyntaxTheme::OceanLight => "base16-ocean.light",
        }
    }

    pub fn all() -> &'static [SyntaxTheme] {
        &[
            SyntaxTheme::InspiredGitHub,
            SyntaxTheme::SolarizedLight,
            SyntaxTheme::OceanLight,
        ]
    }
}

/// Complete configuration for a notebook build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Notebook title; blank or missing means the default title
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: SyntaxTheme,
    #[serde(default)]
    pub pdf: PDF,
    /// Also write the intermediate HTML document when set
    #[serde(default)]
    pub html: Option<HTML>,
}

/// Values given on the command line, which win over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub title: Option<String>,
    pub theme: Option<SyntaxTheme>,
    pub pdf_outfile: Option<PathBuf>,
    pub html_outfile: Option<PathBuf>,
    pub no_pdf: bool,
}

impl Configuration {
    pub const FILE_NAME: &'static str = "notebook.toml";

    pub fn load(path: &Path) -> Result<Configuration> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))
    }

    /// Load an explicitly requested file, or `notebook.toml` from the working
    /// directory if it exists, or fall back to the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Configuration> {
        match explicit {
            Some(path) => Configuration::load(path),
            None => {
                let path = PathBuf::from(Configuration::FILE_NAME);
                if path.is_file() {
                    log::info!("Using configuration from {}", path.display());
                    Configuration::load(&path)
                } else {
                    Ok(Configuration::default())
                }
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(title) = overrides.title {
            self.title = Some(title);
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if let Some(outfile) = overrides.pdf_outfile {
            self.pdf.outfile = Some(outfile);
        }
        if let Some(outfile) = overrides.html_outfile {
            self.html = Some(HTML { outfile });
        }
        if overrides.no_pdf {
            self.pdf.enabled = false;
        }
    }

    /// The sinks this configuration renders to, PDF first.
    pub fn sinks(&self) -> Result<Vec<Sink>> {
        let mut sinks = Vec::new();
        if self.pdf.enabled {
            sinks.push(Sink::PDF(self.pdf.clone()));
        }
        if let Some(html) = &self.html {
            sinks.push(Sink::HTML(html.clone()));
        }
        if sinks.is_empty() {
            return Err(anyhow!(
                "No output configured: PDF output is disabled and no HTML output was requested"
            ));
        }
        Ok(sinks)
    }
}
