//! Generic structural traversal over history trees.
//!
//! The walker copies records and sequences field by field and hands every
//! tagged variant it meets to a caller-supplied transform. It never descends
//! into a variant itself: the transform decides whether and how to visit the
//! variant's payload.
//!
//! License: MIT OR APACHE 2.0

use serde_json::{Map, Value};

use crate::node::{classify, Node, ShapeKeys, Variant};

/// Tree walker bound to one set of shape keys.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'k> {
    keys: &'k ShapeKeys,
}

impl<'k> Walker<'k> {
    pub fn new(keys: &'k ShapeKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &'k ShapeKeys {
        self.keys
    }

    /// Rebuilds `node`, replacing each outermost variant with `transform(variant)`.
    ///
    /// Primitives come back unchanged. Records and sequences come back as fresh
    /// copies with every child walked. The transform's return value is used
    /// verbatim. The first error from `transform` aborts the walk.
    pub fn walk<F, E>(&self, node: &Value, transform: &mut F) -> Result<Value, E>
    where
        F: FnMut(Variant<'_>) -> Result<Value, E>,
    {
        match classify(node, self.keys) {
            Node::Primitive(value) => Ok(value.clone()),
            Node::Variant(variant) => transform(variant),
            Node::Record(fields) => {
                let mut copy = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    copy.insert(key.clone(), self.walk(value, transform)?);
                }
                Ok(Value::Object(copy))
            }
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.walk(item, transform))
                .collect::<Result<Vec<_>, E>>()
                .map(Value::Array),
        }
    }
}
