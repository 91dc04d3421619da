// histscrub-core/src/lib.rs
//! # histscrub Core Library
//!
//! `histscrub-core` redacts exported debugger histories: trees of tagged
//! variants (one case of a sum type, identified by a tag key) and plain keyed
//! records. Variants whose tag, and records whose field names, match a set of
//! watch terms are handed to a substitution strategy; everything else is
//! copied through untouched.
//!
//! The library is pure and synchronous. It never mutates its input and never
//! returns a partially sanitized tree.
//!
//! ## Modules
//!
//! * `node`: Shape keys and the once-per-node variant/record classification.
//! * `walker`: Structural traversal that hands variants to a transform.
//! * `matcher`: Compiles watch terms into case-insensitive matchers.
//! * `envelope`: Locates and rebuilds the history in either wire shape.
//! * `substitute`: The `Substitute` strategy trait and built-in strategies.
//! * `sanitizer`: The `HistorySanitizer` itself.
//! * `config`: YAML configuration loading, merging, and validation.
//! * `headless`: One-shot string-in, string-out helpers.
//! * `errors`: The `ScrubError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use histscrub_core::{sanitize, Hit, HitKind};
//! use serde_json::{json, Value};
//!
//! fn main() -> anyhow::Result<()> {
//!     let export = json!({
//!         "history": [
//!             {"$": "SubmitLogin", "a": "bob", "b": {"password": "hunter2"}}
//!         ]
//!     });
//!
//!     let mut substitute = |hit: Hit| -> anyhow::Result<Value> {
//!         let mut node = hit.value;
//!         if let (HitKind::Record, Some(fields)) = (hit.kind, node.as_object_mut()) {
//!             for name in &hit.names {
//!                 fields.insert(name.clone(), json!("[FILTERED]"));
//!             }
//!         }
//!         Ok(node)
//!     };
//!
//!     let clean = sanitize(&export, ["password"], &mut substitute)?;
//!     assert_eq!(clean["history"][0]["b"]["password"], "[FILTERED]");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Sanitization returns `ScrubError`. Configuration loading and the headless
//! helpers return `anyhow::Error` with context attached.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod envelope;
pub mod errors;
pub mod headless;
pub mod matcher;
pub mod node;
pub mod sanitizer;
pub mod substitute;
pub mod walker;

/// Re-exports the configuration types and functions.
pub use config::{config_candidate_paths, merge_config, ScrubConfig};

/// Re-exports the error type.
pub use errors::ScrubError;

pub use envelope::{Envelope, WireFormat};
pub use matcher::{Matcher, WatchList, WatchTerm, MAX_PATTERN_LENGTH};
pub use node::{classify, Node, ShapeKeys, Variant};
pub use sanitizer::{sanitize, sanitize_with_keys, HistorySanitizer, Sanitized};
pub use substitute::{
    occurrences_by_term, Hit, HitKind, HitRecord, Marker, Passthrough, Recorder, Strategy,
    Substitute, DEFAULT_MARKER,
};
pub use walker::Walker;

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{headless_sanitize_report, headless_sanitize_str, HeadlessOutcome};
