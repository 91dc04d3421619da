//! `histscrub sanitize`: decode an export, redact it, hand it to a sink.

use anyhow::{Context, Result};
use histscrub_core::{headless_sanitize_report, occurrences_by_term};
use is_terminal::IsTerminal;
use log::info;
use std::io;

use crate::cli::SanitizeCommand;
use crate::commands::{load_config, read_input};
use crate::sink::{FileSink, StdoutSink, StorageSink};
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

pub fn run_sanitize(cmd: &SanitizeCommand, theme: &ThemeMap) -> Result<()> {
    info!("Starting sanitize operation.");

    let mut config = load_config(&cmd.watch)?;
    if let Some(text) = &cmd.replace_with {
        config.replace_with = Some(text.clone());
    }
    if let Some(choice) = cmd.strategy {
        config.strategy = Some(choice.into());
    }
    config.validate().context("Invalid sanitize options")?;

    let mut stderr = io::stderr();
    let supports_color = stderr.is_terminal();
    if config.watch.is_empty() {
        output_format::print_warn_message(
            &mut stderr,
            "No watch terms configured; the export will be copied unchanged.",
            theme,
            supports_color,
        )?;
    }

    let input = read_input(&cmd.watch)?;
    let outcome = headless_sanitize_report(&config, &input, cmd.pretty)?;

    let mut sink: Box<dyn StorageSink> = match &cmd.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    };
    sink.store(&outcome.output)
        .with_context(|| format!("Failed to store sanitized export to {}", sink.describe()))?;

    if cmd.output.is_some() {
        output_format::print_info_message(
            &mut stderr,
            &format!("Sanitized export written to {}", sink.describe()),
            theme,
            supports_color,
        )?;
    }

    if !cmd.no_summary {
        output_format::print_summary(
            &mut stderr,
            &format!("Substitutions ({} envelope)", outcome.format),
            &occurrences_by_term(&outcome.records),
            theme,
            supports_color,
        )?;
    }

    info!("Sanitize operation completed with {} substitution(s).", outcome.records.len());
    Ok(())
}
