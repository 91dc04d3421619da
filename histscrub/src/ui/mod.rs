//! Terminal presentation: theme and styled stderr output.

pub mod output_format;
pub mod theme;
