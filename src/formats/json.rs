//! JSON input by structural descent.
//!
//! Objects become one child per key (titled by the key, in document order), arrays one
//! child per element (titled `[i]`), and scalars become primitive leaves. The document
//! value itself is the root.

use crate::error::{Error, Result};
use crate::formats::Limits;
use crate::section::{NodeId, NodeKind, Scalar, SectionNode, SectionTree, ROOT};
use serde::Deserialize;
use serde_json::{Deserializer, Value};
use tracing::debug;

fn kind_of(value: &Value) -> NodeKind {
    match value {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        _ => NodeKind::Primitive,
    }
}

fn scalar(value: &Value) -> Scalar {
    match value {
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => Scalar::Number(n.clone()),
        Value::String(s) => Scalar::String(s.clone()),
        Value::Null | Value::Object(_) | Value::Array(_) => Scalar::Null,
    }
}

fn node_for(title: String, level: usize, value: &Value) -> SectionNode {
    match kind_of(value) {
        NodeKind::Primitive => SectionNode::primitive(title, level, scalar(value)),
        kind => SectionNode::new(kind, title, level),
    }
}

/// Builds a tree from an already parsed JSON value.
///
/// A scalar document yields a lone primitive root carrying the value.
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] when nesting passes the limit under
/// [`Overflow::Error`](crate::formats::Overflow::Error).
pub fn build_tree(value: &Value, limits: &Limits) -> Result<SectionTree> {
    let mut tree = SectionTree::new(kind_of(value), "");
    if !matches!(value, Value::Object(_) | Value::Array(_)) {
        *tree.root_mut() = node_for(String::new(), 0, value);
        return Ok(tree);
    }

    let mut pending: Vec<(NodeId, &Value)> = vec![(ROOT, value)];
    while let Some((parent, value)) = pending.pop() {
        let children: Vec<(String, &Value)> = match value {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("[{i}]"), v))
                .collect(),
            _ => continue,
        };
        if children.is_empty() {
            continue;
        }

        let level = tree.node(parent).level + 1;
        if !limits.admit_children(&mut tree, parent, level)? {
            continue;
        }
        for (title, child) in children {
            let index = tree.add_child(parent, node_for(title, level, child));
            if matches!(child, Value::Object(_) | Value::Array(_)) {
                pending.push((index, child));
            }
        }
    }

    debug!(nodes = tree.node_count(), "json descended");
    Ok(tree)
}

fn decoding_error(e: &serde_json::Error) -> Error {
    Error::Decoding {
        line: e.line(),
        column: e.column(),
        reason: e.to_string(),
    }
}

/// Drops a value without recursing, however deeply it nests.
fn dismantle(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

/// Parses JSON text and builds its tree.
///
/// Nesting is bounded only by `limits`: the parser grows its stack on demand instead of
/// stopping at serde_json's recursion limit.
///
/// # Errors
///
/// Returns [`Error::Decoding`] with the line and column of a syntax error, or the errors
/// of [`build_tree`].
pub fn parse_tree(text: &str, limits: &Limits) -> Result<SectionTree> {
    let mut deserializer = Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(|e| decoding_error(&e))?;
    deserializer.end().map_err(|e| decoding_error(&e))?;

    let tree = build_tree(&value, limits);
    dismantle(value);
    tree
}

#[cfg(test)]
#[path = "../tests/json.rs"]
mod tests;
