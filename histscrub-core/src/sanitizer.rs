//! History sanitizer: watch-term matching and bottom-up substitution.
//!
//! For every history entry the sanitizer cleans the entry's payload first and
//! only then tests the entry's own tag, so a substitution for an outer variant
//! always receives data whose inner matches are already replaced:
//!
//! * a payload slot holding a variant is cleaned recursively;
//! * a payload slot holding a record is substituted when any of its own field
//!   names match (nested records below it are not inspected);
//! * a payload slot holding a list is walked, cleaning every variant in it;
//! * primitives are kept.
//!
//! Records are treated differently depending on where they sit. A record
//! directly in a payload slot is only tested by its own field names and is
//! otherwise kept as-is, so variants nested inside it are not visited. A
//! record inside a list is never field-matched, but it is walked, so variants
//! nested inside it are cleaned.
//!
//! The input is never mutated. Every call either returns a complete copy of the
//! envelope or an error, never a partially cleaned tree.
//!
//! Recursion follows the nesting of the input. Trees decoded with `serde_json`
//! are at most 128 levels deep; values built in memory with deeper nesting can
//! exhaust the stack.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde_json::{Map, Value};

use crate::envelope::{Envelope, WireFormat};
use crate::errors::{Result, ScrubError};
use crate::matcher::{WatchList, WatchTerm};
use crate::node::{classify, Node, ShapeKeys, Variant};
use crate::substitute::{Hit, HitKind, Substitute};
use crate::walker::Walker;

/// Sanitizes exported histories against a compiled watch list.
#[derive(Debug, Clone)]
pub struct HistorySanitizer {
    keys: ShapeKeys,
    watch: WatchList,
}

/// A sanitized envelope together with the shape it was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub format: WireFormat,
    pub envelope: Value,
}

impl HistorySanitizer {
    pub fn new(watch: WatchList) -> Self {
        Self::with_keys(watch, ShapeKeys::default())
    }

    pub fn with_keys(watch: WatchList, keys: ShapeKeys) -> Self {
        Self { keys, watch }
    }

    pub fn keys(&self) -> &ShapeKeys {
        &self.keys
    }

    pub fn watch_list(&self) -> &WatchList {
        &self.watch
    }

    /// Returns a copy of `envelope` with every history entry cleaned.
    pub fn sanitize<S>(&self, envelope: &Value, substitute: &mut S) -> Result<Value>
    where
        S: Substitute + ?Sized,
    {
        self.sanitize_detailed(envelope, substitute)
            .map(|sanitized| sanitized.envelope)
    }

    /// Like [`sanitize`](Self::sanitize), also reporting the detected wire format.
    pub fn sanitize_detailed<S>(&self, envelope: &Value, substitute: &mut S) -> Result<Sanitized>
    where
        S: Substitute + ?Sized,
    {
        let located = Envelope::detect(envelope, &self.keys)?;
        let mut cleaned = Vec::with_capacity(located.history().len());

        for (index, entry) in located.history().iter().enumerate() {
            let path = format!("history[{}]", index);
            let Node::Variant(variant) = classify(entry, &self.keys) else {
                return Err(ScrubError::malformed_entry(path));
            };
            cleaned.push(self.clean_variant(variant, &path, substitute)?);
        }

        debug!(
            "Sanitized {} history entries ({} envelope).",
            cleaned.len(),
            located.format()
        );

        Ok(Sanitized {
            format: located.format(),
            envelope: located.rebuild(cleaned),
        })
    }

    /// Cleans an arbitrary node outside of an envelope: records and lists are
    /// walked, every variant found is cleaned. Error paths start at `root`.
    pub fn clean_node<S>(&self, node: &Value, substitute: &mut S) -> Result<Value>
    where
        S: Substitute + ?Sized,
    {
        Walker::new(&self.keys).walk(node, &mut |variant: Variant<'_>| {
            self.clean_variant(variant, "root", substitute)
        })
    }

    fn clean_variant<S>(&self, variant: Variant<'_>, path: &str, substitute: &mut S) -> Result<Value>
    where
        S: Substitute + ?Sized,
    {
        let tag = variant
            .tag()
            .ok_or_else(|| ScrubError::malformed_entry(path))?;
        let tag_key = variant.tag_key();

        let mut fields = Map::with_capacity(variant.fields().len());
        for (key, value) in variant.fields() {
            if key == tag_key {
                fields.insert(key.clone(), value.clone());
                continue;
            }
            let slot_path = format!("{}.{}", path, key);
            let cleaned = match classify(value, &self.keys) {
                Node::Primitive(primitive) => primitive.clone(),
                Node::Variant(inner) => self.clean_variant(inner, &slot_path, substitute)?,
                Node::Record(record) => self.clean_record(record, value, &slot_path, substitute)?,
                Node::Sequence(_) => {
                    let item_path = format!("{}[]", slot_path);
                    Walker::new(&self.keys).walk(value, &mut |inner: Variant<'_>| {
                        self.clean_variant(inner, &item_path, substitute)
                    })?
                }
            };
            fields.insert(key.clone(), cleaned);
        }
        let cleaned = Value::Object(fields);

        let terms: Vec<String> = self
            .watch
            .matching(tag)
            .map(|m| m.source().to_string())
            .collect();
        if terms.is_empty() {
            return Ok(cleaned);
        }

        debug!("Substituting variant '{}' at {}.", tag, path);
        let hit = Hit {
            kind: HitKind::Variant,
            value: cleaned,
            tag_key: Some(tag_key.to_string()),
            names: vec![tag.to_string()],
            terms,
        };
        Ok(substitute.substitute(hit)?)
    }

    fn clean_record<S>(
        &self,
        record: &Map<String, Value>,
        value: &Value,
        path: &str,
        substitute: &mut S,
    ) -> Result<Value>
    where
        S: Substitute + ?Sized,
    {
        let mut names = Vec::new();
        let mut terms: Vec<String> = Vec::new();
        for name in record.keys() {
            let mut fired = false;
            for matcher in self.watch.matching(name) {
                fired = true;
                if !terms.iter().any(|t| t == matcher.source()) {
                    terms.push(matcher.source().to_string());
                }
            }
            if fired {
                names.push(name.clone());
            }
        }

        if names.is_empty() {
            return Ok(value.clone());
        }

        debug!("Substituting record at {} (fields: {:?}).", path, names);
        let hit = Hit {
            kind: HitKind::Record,
            value: value.clone(),
            tag_key: None,
            names,
            terms,
        };
        Ok(substitute.substitute(hit)?)
    }
}

/// One-shot sanitization with the default shape keys.
///
/// Compiles `watch_terms`, then cleans `envelope` with `substitute`.
pub fn sanitize<I, T, S>(envelope: &Value, watch_terms: I, substitute: &mut S) -> Result<Value>
where
    I: IntoIterator<Item = T>,
    T: Into<WatchTerm>,
    S: Substitute + ?Sized,
{
    sanitize_with_keys(envelope, watch_terms, ShapeKeys::default(), substitute)
}

/// One-shot sanitization with explicit shape keys.
pub fn sanitize_with_keys<I, T, S>(
    envelope: &Value,
    watch_terms: I,
    keys: ShapeKeys,
    substitute: &mut S,
) -> Result<Value>
where
    I: IntoIterator<Item = T>,
    T: Into<WatchTerm>,
    S: Substitute + ?Sized,
{
    let watch = WatchList::compile(watch_terms)?;
    HistorySanitizer::with_keys(watch, keys).sanitize(envelope, substitute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitute::{Marker, Passthrough, Recorder};
    use serde_json::json;

    fn sanitizer(terms: &[&str]) -> HistorySanitizer {
        HistorySanitizer::new(WatchList::compile(terms.iter().copied()).unwrap())
    }

    #[test]
    fn test_matching_tag_masks_payload() {
        let s = sanitizer(&["login"]);
        let env = json!({"history": [{"$": "SubmitLogin", "a": "bob", "b": "hunter2"}]});
        let out = s.sanitize(&env, &mut Marker::default()).unwrap();
        assert_eq!(
            out,
            json!({"history": [{"$": "SubmitLogin", "a": "[FILTERED]", "b": "[FILTERED]"}]})
        );
    }

    #[test]
    fn test_nested_variant_cleaned_before_parent_test() {
        let s = sanitizer(&["secret"]);
        let env = json!({"history": [
            {"$": "Wrapper", "a": {"$": "SecretValue", "a": "x"}}
        ]});
        let out = s.sanitize(&env, &mut Marker::default()).unwrap();
        assert_eq!(
            out,
            json!({"history": [{"$": "Wrapper", "a": {"$": "SecretValue", "a": "[FILTERED]"}}]})
        );
    }

    #[test]
    fn test_record_field_match_is_single_level() {
        let s = sanitizer(&["password"]);
        let env = json!({"history": [{"$": "Save", "a": {
            "form": {"password": "deep"},
            "name": "n"
        }}]});
        let mut recorder = Recorder::new(Passthrough);
        let out = s.sanitize(&env, &mut recorder).unwrap();
        assert_eq!(out, env);
        assert!(recorder.records().is_empty());
    }

    #[test]
    fn test_variants_inside_lists_are_cleaned() {
        let s = sanitizer(&["token"]);
        let env = json!({"history": [{"$": "Batch", "a": [
            {"$": "SetToken", "a": "abc"},
            {"$": "Noop"},
            "plain"
        ]}]});
        let out = s.sanitize(&env, &mut Marker::default()).unwrap();
        assert_eq!(
            out,
            json!({"history": [{"$": "Batch", "a": [
                {"$": "SetToken", "a": "[FILTERED]"},
                {"$": "Noop"},
                "plain"
            ]}]})
        );
    }

    #[test]
    fn test_non_string_tag_is_malformed() {
        let s = sanitizer(&["x"]);
        let env = json!({"history": [{"$": "Ok", "a": {"$": 7}}]});
        let err = s.sanitize(&env, &mut Passthrough).unwrap_err();
        match err {
            ScrubError::MalformedEntry { path } => assert_eq!(path, "history[0].a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_primitive_entry_is_malformed() {
        let s = sanitizer(&["x"]);
        let env = json!({"history": ["just a string"]});
        let err = s.sanitize(&env, &mut Passthrough).unwrap_err();
        assert!(matches!(err, ScrubError::MalformedEntry { .. }));
    }

    #[test]
    fn test_substitute_error_propagates_unmodified() {
        let s = sanitizer(&["boom"]);
        let env = json!({"history": [{"$": "Boom"}]});
        let mut failing = |_hit: Hit| -> anyhow::Result<Value> { anyhow::bail!("sink refused") };
        let err = s.sanitize(&env, &mut failing).unwrap_err();
        assert!(matches!(err, ScrubError::Substitute(_)));
        assert_eq!(err.to_string(), "sink refused");
    }

    #[test]
    fn test_clean_node_walks_outside_envelope() {
        let s = sanitizer(&["pin"]);
        let node = json!({"msgs": [{"$": "EnterPin", "a": "1234"}], "count": 1});
        let out = s.clean_node(&node, &mut Marker::default()).unwrap();
        assert_eq!(
            out,
            json!({"msgs": [{"$": "EnterPin", "a": "[FILTERED]"}], "count": 1})
        );
    }

    #[test]
    fn test_record_in_slot_is_kept_but_record_in_list_is_walked() {
        let s = sanitizer(&["pin"]);
        let env = json!({"history": [{
            "$": "Batch",
            "a": {"inner": {"$": "SetPin", "a": "1"}},
            "b": [{"inner": {"$": "SetPin", "a": "2"}}]
        }]});
        let out = s.sanitize(&env, &mut Marker::default()).unwrap();
        assert_eq!(
            out,
            json!({"history": [{
                "$": "Batch",
                "a": {"inner": {"$": "SetPin", "a": "1"}},
                "b": [{"inner": {"$": "SetPin", "a": "[FILTERED]"}}]
            }]})
        );
    }

    #[test]
    fn test_clean_node_error_path_starts_at_root() {
        let s = sanitizer(&["x"]);
        let node = json!([{"$": "Ok", "a": {"$": false}}]);
        let err = s.clean_node(&node, &mut Passthrough).unwrap_err();
        match err {
            ScrubError::MalformedEntry { path } => assert_eq!(path, "root.a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_watch_term_substitutes_everything() {
        let env = json!({"history": [{"$": "Login", "a": {"password": "p"}}]});
        let out = sanitize(&env, [""], &mut Marker::default()).unwrap();
        assert_ne!(out, env);
        assert_eq!(out, json!({"history": [{"$": "Login", "a": "[FILTERED]"}]}));
    }

    #[test]
    fn test_sanitize_detailed_reports_format() {
        let s = sanitizer(&["x"]);
        let wrapped = json!({"a": {"history": []}});
        let result = s.sanitize_detailed(&wrapped, &mut Passthrough).unwrap();
        assert_eq!(result.format, WireFormat::Wrapped);
        assert_eq!(result.envelope, wrapped);
    }
}
