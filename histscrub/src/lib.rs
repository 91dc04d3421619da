// histscrub/src/lib.rs
//! # histscrub CLI
//!
//! Command-line front end for `histscrub-core`. It reads an exported history
//! from a file or stdin, sanitizes it, and hands the result to a storage sink.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod sink;
pub mod ui;
