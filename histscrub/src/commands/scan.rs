//! `histscrub scan`: dry run that reports what would be substituted.

use anyhow::{Context, Result};
use chrono::Utc;
use histscrub_core::{HitRecord, Passthrough, Recorder, WireFormat};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::cli::ScanCommand;
use crate::commands::{load_config, read_input};
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub generated_at: String,
    pub input_sha256: String,
    pub format: WireFormat,
    pub total: usize,
    pub occurrences: BTreeMap<String, usize>,
    pub hits: Vec<HitRecord>,
}

impl ScanReport {
    pub fn exceeds(&self, threshold: Option<usize>) -> bool {
        threshold.is_some_and(|limit| self.total > limit)
    }
}

/// Scans `input` without modifying it.
pub fn scan_input(cmd: &ScanCommand, input: &str) -> Result<ScanReport> {
    let config = load_config(&cmd.watch)?;
    let envelope: Value = serde_json::from_str(input).context("Failed to decode history export")?;

    let sanitizer = config.sanitizer()?;
    let mut recorder = Recorder::new(Passthrough);
    let scanned = sanitizer
        .sanitize_detailed(&envelope, &mut recorder)
        .context("Scan failed")?;

    let occurrences = recorder.occurrences_by_term();
    let hits = recorder.into_records();
    Ok(ScanReport {
        generated_at: Utc::now().to_rfc3339(),
        input_sha256: hex::encode(Sha256::digest(input.as_bytes())),
        format: scanned.format,
        total: hits.len(),
        occurrences,
        hits,
    })
}

/// Runs the scan command. Returns `false` when the hit count is above
/// `--fail-over-threshold`.
pub fn run_scan(cmd: &ScanCommand, theme: &ThemeMap) -> Result<bool> {
    info!("Starting scan operation.");
    let input = read_input(&cmd.watch)?;
    let report = scan_input(cmd, &input)?;

    if cmd.json_stdout {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else {
        let mut stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        output_format::print_summary(
            &mut stderr,
            &format!("Scan ({} envelope, {} hit(s))", report.format, report.total),
            &report.occurrences,
            theme,
            supports_color,
        )?;
    }

    if report.exceeds(cmd.fail_over_threshold) {
        let mut stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        output_format::print_error_message(
            &mut stderr,
            &format!(
                "{} substitution(s) would be made, above the threshold of {}.",
                report.total,
                cmd.fail_over_threshold.unwrap_or_default()
            ),
            theme,
            supports_color,
        )?;
        return Ok(false);
    }
    Ok(true)
}
