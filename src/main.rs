use anyhow::{Context, Result};
use cli::{Cli, RenderArgs};
use config::Configuration;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use notebook::BuildReport;
use std::process::ExitCode;

mod archive;
mod cli;
mod config;
mod config_wizard;
mod detection;
mod document;
mod highlight;
mod language;
mod notebook;
mod output;
mod sinks;
mod walker;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    match &cli.command {
        cli::Commands::Config => config_wizard::run(),
        cli::Commands::Render(args) => render(args, cli.quiet),
    }
}

fn render(args: &RenderArgs, quiet: bool) -> Result<()> {
    let mut config = Configuration::discover(args.config.as_deref())?;
    config.apply_overrides(args.overrides());

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .with_context(|| "Failed to parse progress style")?
                .progress_chars("#>-"),
        );
        progress.set_message("Highlighting files...");
        progress
    };

    let report = notebook::generate_notebook(&args.input, &config, &progress)
        .with_context(|| format!("Failed to build notebook from {}", args.input.display()))?;

    if !quiet {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &BuildReport) {
    println!();
    println!("{}", style(&report.title).bold());
    println!("  Chapters: {}", report.chapter_count);
    println!("  Files:    {}", report.file_count);

    if !report.skipped.is_empty() {
        println!(
            "  Skipped:  {}",
            style(report.skipped.len()).yellow()
        );
        for skipped in report.skipped.iter() {
            let name = skipped
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| skipped.path.display().to_string());
            println!(
                "    {}/{}: {}",
                skipped.chapter,
                name,
                style(&skipped.reason).dim()
            );
        }
    }

    println!();
    for output in report.outputs.iter() {
        match output.page_count {
            Some(pages) => println!("  Wrote {} ({pages} pages)", output.outfile.display()),
            None => println!("  Wrote {}", output.outfile.display()),
        }
    }
}
