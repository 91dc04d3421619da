//! Command-line interface definition for histscrub.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand, ValueEnum};
use histscrub_core::Strategy;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "histscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact sensitive messages and fields from exported debugger histories",
    long_about = "histscrub walks an exported message history (JSON), finds tagged messages and record fields whose names match a set of watch terms, and replaces them before the export is stored or shared. Matching is case-insensitive and purely name-based; values are never inspected.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all log output.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// Path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true)]
    pub theme: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes an export and writes the result to a file or stdout.
    Sanitize(SanitizeCommand),

    /// Reports what would be substituted, without writing anything.
    Scan(ScanCommand),
}

/// Options shared by every command that loads a watch list.
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Read the export from this file instead of stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Path to a YAML configuration file (merged over the built-in defaults).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Additional watch terms (comma-separated).
    #[arg(long, short = 'w', value_delimiter = ',')]
    pub watch: Vec<String>,

    /// Ignore the built-in watch terms; use only the config file and --watch.
    #[arg(long = "no-defaults")]
    pub no_defaults: bool,
}

#[derive(Args, Debug)]
pub struct SanitizeCommand {
    #[command(flatten)]
    pub watch: WatchArgs,

    /// Write the sanitized export to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Text written over matched data.
    #[arg(long = "replace-with", value_name = "TEXT")]
    pub replace_with: Option<String>,

    /// How matched nodes are rewritten.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyChoice>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Do not print the substitution summary.
    #[arg(long = "no-summary")]
    pub no_summary: bool,
}

#[derive(Args, Debug)]
pub struct ScanCommand {
    #[command(flatten)]
    pub watch: WatchArgs,

    /// Print the scan report as JSON to stdout.
    #[arg(long = "json-stdout")]
    pub json_stdout: bool,

    /// Exit with a non-zero code if more than N substitutions would be made.
    #[arg(long = "fail-over-threshold", value_name = "N")]
    pub fail_over_threshold: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StrategyChoice {
    /// Keep the node's shape and overwrite the matched slots.
    Mask,
    /// Replace the whole node with the marker text.
    Replace,
}

impl From<StrategyChoice> for Strategy {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Mask => Strategy::Mask,
            StrategyChoice::Replace => Strategy::Replace,
        }
    }
}
