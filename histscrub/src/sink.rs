//! Storage sinks for sanitized exports.
//!
//! A sink receives the final encoded output and nothing else; it never sees
//! unsanitized data.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub trait StorageSink {
    /// Persists or forwards one sanitized export.
    fn store(&mut self, payload: &str) -> Result<()>;

    /// Human-readable destination, for messages.
    fn describe(&self) -> String;
}

/// Writes the export to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageSink for FileSink {
    fn store(&mut self, payload: &str) -> Result<()> {
        info!("Writing sanitized export to {}", self.path.display());
        let mut file = fs::File::create(&self.path)
            .with_context(|| format!("Failed to create output file: {}", self.path.display()))?;
        writeln!(file, "{}", payload)
            .with_context(|| format!("Failed to write output file: {}", self.path.display()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes the export to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StorageSink for StdoutSink {
    fn store(&mut self, payload: &str) -> Result<()> {
        info!("Writing sanitized export to stdout.");
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        writeln!(writer, "{}", payload)?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_sink_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.json");
        fs::write(&path, "old content that is longer")?;

        let mut sink = FileSink::new(&path);
        sink.store("{}")?;
        assert_eq!(fs::read_to_string(&path)?, "{}\n");
        assert_eq!(sink.describe(), path.display().to_string());
        Ok(())
    }
}
