//! Command implementations for the histscrub CLI.

pub mod sanitize;
pub mod scan;

use anyhow::{Context, Result};
use histscrub_core::{merge_config, ScrubConfig};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};

use crate::cli::WatchArgs;

/// Builds the effective configuration for a command: built-in defaults
/// (unless disabled), the config file, then `--watch` terms.
pub fn load_config(args: &WatchArgs) -> Result<ScrubConfig> {
    let base = if args.no_defaults {
        match &args.config {
            Some(path) => ScrubConfig::load_from_file(path)?,
            None => ScrubConfig::default(),
        }
    } else {
        ScrubConfig::resolve(args.config.as_deref())?
    };

    let extra = ScrubConfig {
        watch: args.watch.clone(),
        ..Default::default()
    };
    let config = merge_config(base, Some(extra));
    config.validate().context("Invalid watch terms")?;
    debug!("Effective configuration has {} watch terms.", config.watch.len());
    Ok(config)
}

/// Reads the whole export from a file or stdin.
pub fn read_input(args: &WatchArgs) -> Result<String> {
    match &args.input_file {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}
