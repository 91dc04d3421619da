//! Shape classification for history nodes.
//!
//! A decoded history is plain JSON. Whether a mapping is a tagged variant
//! (one case of a sum type) or an ordinary record is decided purely by its
//! keys: a mapping that carries one of the configured tag keys is a variant,
//! anything else is a record. [`classify`] makes that decision once per node
//! and every downstream step switches on the returned [`Node`].
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key names that define the wire shape of variants and envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShapeKeys {
    /// Alternative names of the discriminant key, in priority order.
    /// The current encoding uses `$`, the legacy one `ctor`.
    pub tag_keys: Vec<String>,
    /// Key of a variant's first payload slot. An envelope carrying this key
    /// wraps its history one level deeper.
    pub payload_key: String,
}

impl Default for ShapeKeys {
    fn default() -> Self {
        Self {
            tag_keys: vec!["$".to_string(), "ctor".to_string()],
            payload_key: "a".to_string(),
        }
    }
}

impl ShapeKeys {
    pub fn new<I, S>(tag_keys: I, payload_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag_keys: tag_keys.into_iter().map(Into::into).collect(),
            payload_key: payload_key.into(),
        }
    }

    /// Returns the first configured tag key present in `fields`.
    pub fn tag_key_of(&self, fields: &Map<String, Value>) -> Option<&str> {
        self.tag_keys
            .iter()
            .map(String::as_str)
            .find(|key| fields.contains_key(*key))
    }

    pub fn is_tag_key(&self, key: &str) -> bool {
        self.tag_keys.iter().any(|k| k == key)
    }
}

/// A node of the history tree, classified by shape.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// String, number, boolean or null.
    Primitive(&'a Value),
    Sequence(&'a [Value]),
    Variant(Variant<'a>),
    Record(&'a Map<String, Value>),
}

/// A borrowed view of a tagged variant.
#[derive(Debug, Clone, Copy)]
pub struct Variant<'a> {
    tag_key: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> Variant<'a> {
    /// The key that carries the discriminant on this node.
    pub fn tag_key(&self) -> &'a str {
        self.tag_key
    }

    /// The discriminant, or `None` when the tag value is not a string.
    pub fn tag(&self) -> Option<&'a str> {
        self.fields.get(self.tag_key).and_then(Value::as_str)
    }

    /// Payload slots in insertion order, without the tag key.
    pub fn payload(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        let tag_key = self.tag_key;
        self.fields.iter().filter(move |(key, _)| key.as_str() != tag_key)
    }

    /// All keys of the node, tag included.
    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }
}

/// Classifies `node` by shape.
pub fn classify<'a>(node: &'a Value, keys: &'a ShapeKeys) -> Node<'a> {
    match node {
        Value::Object(fields) => match keys.tag_key_of(fields) {
            Some(tag_key) => Node::Variant(Variant { tag_key, fields }),
            None => Node::Record(fields),
        },
        Value::Array(items) => Node::Sequence(items),
        other => Node::Primitive(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives_are_never_containers() {
        let keys = ShapeKeys::default();
        for value in [json!(null), json!(1), json!("x"), json!(true)] {
            assert!(matches!(classify(&value, &keys), Node::Primitive(_)));
        }
    }

    #[test]
    fn test_variant_detected_by_either_tag_key() {
        let keys = ShapeKeys::default();
        let current = json!({"$": "Tick", "a": 1});
        let legacy = json!({"ctor": "Tick", "_0": 1});

        match classify(&current, &keys) {
            Node::Variant(v) => {
                assert_eq!(v.tag_key(), "$");
                assert_eq!(v.tag(), Some("Tick"));
            }
            other => panic!("expected variant, got {:?}", other),
        }
        match classify(&legacy, &keys) {
            Node::Variant(v) => assert_eq!(v.tag_key(), "ctor"),
            other => panic!("expected variant, got {:?}", other),
        }
    }

    #[test]
    fn test_record_has_no_tag_key() {
        let keys = ShapeKeys::default();
        let record = json!({"password": "p", "expiration": "tomorrow"});
        assert!(matches!(classify(&record, &keys), Node::Record(_)));
    }

    #[test]
    fn test_non_string_tag_is_still_a_variant_without_tag() {
        let keys = ShapeKeys::default();
        let node = json!({"$": 3});
        match classify(&node, &keys) {
            Node::Variant(v) => assert_eq!(v.tag(), None),
            other => panic!("expected variant, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_skips_tag_and_keeps_order() {
        let keys = ShapeKeys::new(["tag"], "arg0");
        let node = json!({"arg1": 2, "tag": "T", "arg0": 1});
        let Node::Variant(v) = classify(&node, &keys) else {
            panic!("expected variant");
        };
        let names: Vec<&str> = v.payload().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["arg1", "arg0"]);
    }
}
