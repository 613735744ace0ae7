//! JSON targets.
//!
//! Both targets are assembled bottom-up over the arena: nodes always follow their parent,
//! so visiting indices in reverse finishes every child before its parent, with no
//! recursion however deep the tree is.

use super::{unsupported, SerializeOptions, Target};
use crate::error::Result;
use crate::section::{Body, NodeKind, Scalar, SectionTree, ROOT};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

fn scalar_value(tree: &SectionTree, index: usize, scalar: &Scalar, target: Target) -> Result<Value> {
    Ok(match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => Value::Number(n.clone()),
        Scalar::String(s) => Value::String(s.clone()),
        Scalar::Binary(_) => return Err(unsupported(tree, index, scalar, target)),
    })
}

fn take_children(slots: &mut [Option<Value>], children: &[usize]) -> Vec<Value> {
    children
        .iter()
        .map(|&child| slots[child].take().unwrap_or(Value::Null))
        .collect()
}

/// Builds the outline form, optionally wrapped in the metadata envelope.
///
/// # Errors
///
/// Fails on binary values.
pub fn outline(tree: &SectionTree, options: &SerializeOptions) -> Result<Value> {
    let mut slots: Vec<Option<Value>> = vec![None; tree.node_count()];

    for index in (0..tree.node_count()).rev() {
        let node = tree.node(index);
        let mut map = Map::new();
        if index != ROOT {
            map.insert("id".into(), Value::String(node.id.clone()));
        }
        map.insert("title".into(), Value::String(node.title.clone()));
        if index != ROOT {
            map.insert("level".into(), json!(node.level));
        }
        map.insert("kind".into(), json!(node.kind.as_str()));
        map.insert("role".into(), Value::String(super::role(tree, index)));
        if let Some(number) = &node.number {
            map.insert("number".into(), Value::String(number.clone()));
        }

        match &node.body {
            Body::Value(scalar) => {
                let value = scalar_value(tree, index, scalar, Target::Json)?;
                map.insert("value".into(), value);
            }
            Body::Lines(lines) => {
                let container = matches!(node.kind, NodeKind::Object | NodeKind::Array);
                let skip = lines.is_empty() && (container || index == ROOT);
                if !skip {
                    let text = node.body.text(options.trim_content);
                    map.insert("content".into(), Value::String(text));
                }
            }
        }
        if node.truncated {
            map.insert("truncated".into(), Value::Bool(true));
        }

        let children = take_children(&mut slots, &node.children_indices);
        map.insert("children".into(), Value::Array(children));
        slots[index] = Some(Value::Object(map));
    }

    let tree_value = slots[ROOT].take().unwrap_or(Value::Null);
    if !options.envelope {
        return Ok(tree_value);
    }
    Ok(json!({
        "metadata": {
            "generator": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "source_type": tree.root().kind.as_str(),
            "numbering": options.numbering.as_str(),
            "stats": tree.stats(),
        },
        "tree": tree_value,
    }))
}

/// Inserts `value` under `key`, turning repeated keys into an array of their values.
fn merge_entry(map: &mut Map<String, Value>, merged: &mut HashSet<String>, key: &str, value: Value) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) if merged.contains(key) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
            merged.insert(key.to_string());
        }
    }
}

/// Rebuilds the plain value the tree describes.
///
/// Objects come back keyed by child title and arrays by position, so JSON input is
/// reproduced exactly. Repeated titles, which XML allows, collect into an array. Sections
/// become `{"content": ..., "children": {...}}`.
///
/// # Errors
///
/// Fails on binary values.
pub fn plain(tree: &SectionTree, options: &SerializeOptions) -> Result<Value> {
    let mut slots: Vec<Option<Value>> = vec![None; tree.node_count()];

    for index in (0..tree.node_count()).rev() {
        let node = tree.node(index);
        let children = take_children(&mut slots, &node.children_indices);
        let titled = node
            .children_indices
            .iter()
            .map(|&child| tree.node(child).title.as_str())
            .zip(children);

        let value = match (&node.body, node.kind) {
            (Body::Value(scalar), _) => scalar_value(tree, index, scalar, Target::JsonPlain)?,
            (_, NodeKind::Array) => Value::Array(titled.map(|(_, v)| v).collect()),
            (_, NodeKind::Object) => {
                let mut map = Map::new();
                let mut merged = HashSet::new();
                for (title, value) in titled {
                    merge_entry(&mut map, &mut merged, title, value);
                }
                Value::Object(map)
            }
            (Body::Lines(_), _) => {
                let mut sections = Map::new();
                let mut merged = HashSet::new();
                for (title, value) in titled {
                    merge_entry(&mut sections, &mut merged, title, value);
                }
                let mut map = Map::new();
                if !node.body.is_empty() {
                    let text = node.body.text(options.trim_content);
                    map.insert("content".into(), Value::String(text));
                }
                if !sections.is_empty() {
                    map.insert("children".into(), Value::Object(sections));
                }
                Value::Object(map)
            }
        };
        slots[index] = Some(value);
    }

    Ok(slots[ROOT].take().unwrap_or(Value::Null))
}
