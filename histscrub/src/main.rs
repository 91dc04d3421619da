// histscrub/src/main.rs
//! histscrub entry point.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::process::ExitCode;

use histscrub::cli::{Cli, Commands};
use histscrub::commands::{sanitize::run_sanitize, scan::run_scan};
use histscrub::logger;
use histscrub::ui::theme::build_theme_map;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));
    info!("histscrub started. Version: {}", env!("CARGO_PKG_VERSION"));

    let theme = build_theme_map(cli.theme.as_deref()).context("Theme error")?;

    let ok = match &cli.command {
        Commands::Sanitize(cmd) => {
            run_sanitize(cmd, &theme)?;
            true
        }
        Commands::Scan(cmd) => run_scan(cmd, &theme)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
