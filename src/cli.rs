use crate::config::{Overrides, SyntaxTheme};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a notebook.toml config file
    Config,
    /// Renders a folder or .zip archive of source files into a notebook
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory or .zip archive to render
    pub input: PathBuf,
    /// Notebook title [default: "My Notebook"]
    #[arg(short, long)]
    pub title: Option<String>,
    /// PDF output path [default: derived from the title]
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Also write the notebook as a standalone HTML page
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,
    /// Skip the PDF output (requires --html)
    #[arg(long, requires = "html")]
    pub no_pdf: bool,
    /// Syntax highlighting theme
    #[arg(long, value_enum)]
    pub theme: Option<SyntaxTheme>,
    /// Configuration file [default: ./notebook.toml if present]
    #[arg(short, long, env = "NOTEBOOK_CONFIG")]
    pub config: Option<PathBuf>,
}

impl RenderArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            title: self.title.clone(),
            theme: self.theme,
            pdf_outfile: self.out.clone(),
            html_outfile: self.html.clone(),
            no_pdf: self.no_pdf,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log more detail (-v for info, -vv for debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when RUST_LOG isn't set
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_flags() {
        let cli = Cli::try_parse_from([
            "code-notebook",
            "-vv",
            "render",
            "course.zip",
            "--title",
            "Week 3",
            "--html",
            "week3.html",
            "--theme",
            "solarized-light",
        ])
        .expect("can parse arguments");

        assert_eq!(cli.log_level(), "debug");
        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.input, PathBuf::from("course.zip"));

        let overrides = args.overrides();
        assert_eq!(overrides.title.as_deref(), Some("Week 3"));
        assert_eq!(overrides.theme, Some(SyntaxTheme::SolarizedLight));
        assert_eq!(overrides.html_outfile, Some(PathBuf::from("week3.html")));
        assert_eq!(overrides.pdf_outfile, None);
        assert!(!overrides.no_pdf);
    }

    #[test]
    fn no_pdf_needs_html() {
        assert!(Cli::try_parse_from(["code-notebook", "render", ".", "--no-pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "code-notebook",
            "render",
            ".",
            "--no-pdf",
            "--html",
            "out.html"
        ])
        .is_ok());
    }

    #[test]
    fn default_log_level_is_warn() {
        let cli = Cli::try_parse_from(["code-notebook", "config"]).expect("can parse arguments");
        assert_eq!(cli.log_level(), "warn");

        let cli =
            Cli::try_parse_from(["code-notebook", "-q", "config"]).expect("can parse arguments");
        assert_eq!(cli.log_level(), "error");
    }
}
