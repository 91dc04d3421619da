//! Substitution strategies for matched nodes.
//!
//! When a variant's tag or a record's field name fires a watch term, the
//! sanitizer hands the (already cleaned) node to a [`Substitute`] and embeds
//! whatever comes back, verbatim. Any `FnMut(Hit) -> anyhow::Result<Value>`
//! closure is a strategy; [`Marker`], [`Passthrough`] and [`Recorder`] cover
//! the common cases.
//!
//! License: MIT OR APACHE 2.0

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default replacement text.
pub const DEFAULT_MARKER: &str = "[FILTERED]";

/// What kind of node fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// A variant whose tag matched.
    Variant,
    /// A record with at least one matching field name.
    Record,
}

/// A matched node on its way to substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub kind: HitKind,
    /// The node, with every nested match already substituted.
    pub value: Value,
    /// The discriminant key, for variant hits.
    pub tag_key: Option<String>,
    /// The tag or field names that matched.
    pub names: Vec<String>,
    /// Source text of every matcher that fired.
    pub terms: Vec<String>,
}

/// Replaces a matched node.
pub trait Substitute {
    /// Returns the replacement for `hit`. The result is embedded as-is.
    fn substitute(&mut self, hit: Hit) -> anyhow::Result<Value>;
}

impl<F> Substitute for F
where
    F: FnMut(Hit) -> anyhow::Result<Value>,
{
    fn substitute(&mut self, hit: Hit) -> anyhow::Result<Value> {
        self(hit)
    }
}

/// How [`Marker`] rewrites a matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Keep the node's shape; overwrite payload slots (variants) or the
    /// matching fields (records) with the marker.
    #[default]
    Mask,
    /// Replace the whole node with the marker string.
    Replace,
}

/// Writes a fixed marker string over matched data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    text: String,
    strategy: Strategy,
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER, Strategy::Mask)
    }
}

impl Marker {
    pub fn new(text: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            text: text.into(),
            strategy,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn mask(&self, hit: Hit) -> Value {
        let marker = Value::String(self.text.clone());
        let Value::Object(mut fields) = hit.value else {
            return marker;
        };
        match hit.kind {
            HitKind::Variant => {
                let tag_key = hit.tag_key.as_deref();
                for (key, slot) in fields.iter_mut() {
                    if Some(key.as_str()) != tag_key {
                        *slot = marker.clone();
                    }
                }
            }
            HitKind::Record => {
                for name in &hit.names {
                    if let Some(slot) = fields.get_mut(name) {
                        *slot = marker.clone();
                    }
                }
            }
        }
        Value::Object(fields)
    }
}

impl Substitute for Marker {
    fn substitute(&mut self, hit: Hit) -> anyhow::Result<Value> {
        Ok(match self.strategy {
            Strategy::Mask => self.mask(hit),
            Strategy::Replace => Value::String(self.text.clone()),
        })
    }
}

/// Leaves matched nodes as they are. Used for dry-run scans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Substitute for Passthrough {
    fn substitute(&mut self, hit: Hit) -> anyhow::Result<Value> {
        Ok(hit.value)
    }
}

/// One recorded substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitRecord {
    pub kind: HitKind,
    pub names: Vec<String>,
    pub terms: Vec<String>,
}

/// Number of substitutions per watch term. A hit counts once for each term
/// that fired on it.
pub fn occurrences_by_term(records: &[HitRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        for term in &record.terms {
            *counts.entry(term.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Wraps a strategy and remembers every invocation, in call order.
#[derive(Debug, Default)]
pub struct Recorder<S> {
    inner: S,
    records: Vec<HitRecord>,
}

impl<S: Substitute> Recorder<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[HitRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<HitRecord> {
        self.records
    }

    pub fn occurrences_by_term(&self) -> BTreeMap<String, usize> {
        occurrences_by_term(&self.records)
    }
}

impl<S: Substitute> Substitute for Recorder<S> {
    fn substitute(&mut self, hit: Hit) -> anyhow::Result<Value> {
        trace!("Recording {:?} hit on {:?}.", hit.kind, hit.names);
        self.records.push(HitRecord {
            kind: hit.kind,
            names: hit.names.clone(),
            terms: hit.terms.clone(),
        });
        self.inner.substitute(hit)
    }
}
