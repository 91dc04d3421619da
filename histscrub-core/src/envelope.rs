//! Adapter for the two envelope shapes of an exported history.
//!
//! * Flat: `{ "history": [...], ... }`
//! * Wrapped: `{ <payload_key>: { "history": [...], ... }, ... }`
//!
//! An envelope carrying the payload key is wrapped. [`Envelope::detect`]
//! locates the history list either way and [`Envelope::rebuild`] puts a new
//! list back into an otherwise identical copy of the original shape.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{Result, ScrubError};
use crate::node::ShapeKeys;

pub const HISTORY_KEY: &str = "history";

/// Which wire shape an envelope was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    Flat,
    Wrapped,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WireFormat::Flat => write!(f, "flat"),
            WireFormat::Wrapped => write!(f, "wrapped"),
        }
    }
}

/// A located history inside a borrowed envelope.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    format: WireFormat,
    outer: &'a Map<String, Value>,
    body: &'a Map<String, Value>,
    history: &'a [Value],
    payload_key: &'a str,
}

impl<'a> Envelope<'a> {
    pub fn detect(value: &'a Value, keys: &'a ShapeKeys) -> Result<Self> {
        let outer = value.as_object().ok_or_else(|| {
            ScrubError::MalformedEnvelope(format!("expected an object, found {}", kind_of(value)))
        })?;

        let (format, body) = match outer.get(&keys.payload_key) {
            Some(inner) => {
                let body = inner.as_object().ok_or_else(|| {
                    ScrubError::MalformedEnvelope(format!(
                        "wrapped payload `{}` is {}, not an object",
                        keys.payload_key,
                        kind_of(inner)
                    ))
                })?;
                (WireFormat::Wrapped, body)
            }
            None => (WireFormat::Flat, outer),
        };

        let history = body
            .get(HISTORY_KEY)
            .and_then(Value::as_array)
            .ok_or(ScrubError::MissingHistory)?;

        debug!("Detected {} envelope with {} history entries.", format, history.len());

        Ok(Self {
            format,
            outer,
            body,
            history,
            payload_key: &keys.payload_key,
        })
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn history(&self) -> &'a [Value] {
        self.history
    }

    /// Returns a copy of the original envelope with `history` swapped in.
    pub fn rebuild(&self, history: Vec<Value>) -> Value {
        let mut body = self.body.clone();
        body.insert(HISTORY_KEY.to_string(), Value::Array(history));
        match self.format {
            WireFormat::Flat => Value::Object(body),
            WireFormat::Wrapped => {
                let mut outer = self.outer.clone();
                outer.insert(self.payload_key.to_string(), Value::Object(body));
                Value::Object(outer)
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
