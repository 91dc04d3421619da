// File: histscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot, non-interactive sanitization of an
//! encoded history export: decode, sanitize with the configured strategy,
//! re-encode.

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::config::ScrubConfig;
use crate::envelope::WireFormat;
use crate::substitute::{HitRecord, Recorder};

/// Output of [`headless_sanitize_report`].
#[derive(Debug, Clone)]
pub struct HeadlessOutcome {
    /// The re-encoded sanitized envelope.
    pub output: String,
    pub format: WireFormat,
    /// Every substitution performed, in call order.
    pub records: Vec<HitRecord>,
}

/// Sanitizes an encoded envelope and returns it re-encoded as compact JSON.
///
/// # Arguments
///
/// * `config` - The effective configuration (defaults + optional user overrides).
/// * `input` - The JSON text of the exported history.
pub fn headless_sanitize_str(config: &ScrubConfig, input: &str) -> Result<String> {
    headless_sanitize_report(config, input, false).map(|outcome| outcome.output)
}

/// Like [`headless_sanitize_str`], also reporting what was substituted.
pub fn headless_sanitize_report(
    config: &ScrubConfig,
    input: &str,
    pretty: bool,
) -> Result<HeadlessOutcome> {
    // serde_json caps nesting at 128 levels while decoding.
    let envelope: Value = serde_json::from_str(input).context("Failed to decode history export")?;

    let sanitizer = config.sanitizer()?;
    let mut substitute = Recorder::new(config.substitute());
    let sanitized = sanitizer
        .sanitize_detailed(&envelope, &mut substitute)
        .context("Sanitization failed")?;

    let output = if pretty {
        serde_json::to_string_pretty(&sanitized.envelope)?
    } else {
        serde_json::to_string(&sanitized.envelope)?
    };
    let records = substitute.into_records();
    debug!("Headless run performed {} substitution(s).", records.len());

    Ok(HeadlessOutcome {
        output,
        format: sanitized.format,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(terms: &[&str]) -> ScrubConfig {
        ScrubConfig {
            watch: terms.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_headless_sanitize_str() -> Result<()> {
        let input = r#"{"history":[{"$":"SetPassword","a":"hunter2"}],"metadata":{"v":1}}"#;
        let output = headless_sanitize_str(&config(&["password"]), input)?;
        assert_eq!(
            output,
            r#"{"history":[{"$":"SetPassword","a":"[FILTERED]"}],"metadata":{"v":1}}"#
        );
        Ok(())
    }

    #[test]
    fn test_headless_report_counts_hits() -> Result<()> {
        let input = r#"{"a":{"history":[{"$":"Login","a":{"token":"t"}}]}}"#;
        let outcome = headless_sanitize_report(&config(&["token"]), input, true)?;
        assert_eq!(outcome.format, WireFormat::Wrapped);
        assert_eq!(outcome.records.len(), 1);
        assert!(!outcome.output.contains("\"t\""));
        Ok(())
    }

    #[test]
    fn test_headless_rejects_invalid_json() {
        let result = headless_sanitize_str(&config(&["x"]), "{not json");
        assert!(result.is_err());
    }
}
