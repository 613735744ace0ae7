//! XML input by structural descent.
//!
//! The document is first read into a small element tree with `quick-xml`, without
//! recursion, and then mapped onto sections:
//!
//! - the document element is the root;
//! - an element with child elements or attributes is an `object`, its attributes becoming
//!   `@name` leaves ahead of its element children;
//! - an element holding only text is a string leaf, and an empty one is `null`;
//! - when the document element is a `<document>` written by the XML serializer, role
//!   elements (`document`, `folder`, `file`, `section`, `subsection`, ...) carrying a
//!   `title` attribute and a `<content>` child are read back as outline sections: the
//!   content becomes the body and the bookkeeping attributes (`id`, `level`, `kind`,
//!   `type`, `number`, `truncated`) restore the node instead of becoming leaves.
//!
//! Any other document keeps every tag as a title and every attribute as a leaf.

use crate::error::{Error, Result};
use crate::formats::{line_column, Limits};
use crate::section::{Body, NodeId, NodeKind, Scalar, SectionNode, SectionTree, ROOT};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::Number;
use std::borrow::Cow;
use tracing::debug;

const OUTLINE_ATTRS: [&str; 7] = ["id", "title", "level", "kind", "type", "number", "truncated"];

#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether this is a section element written by the XML serializer.
    fn is_outline(&self, readback: bool) -> bool {
        readback
            && is_role_name(&self.name)
            && self.attr("title").is_some()
            && self.children.iter().any(|c| c.name == "content")
    }
}

fn is_role_name(name: &str) -> bool {
    if matches!(name, "document" | "folder" | "file") {
        return true;
    }
    let mut rest = name;
    while let Some(tail) = rest.strip_prefix("sub") {
        rest = tail;
    }
    rest == "section"
}

fn decode_name<R>(reader: &Reader<R>, name: &[u8]) -> String {
    reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        Cow::into_owned,
    )
}

fn open_element<R>(reader: &Reader<R>, e: &BytesStart) -> Element {
    let attrs = e
        .attributes()
        .flatten()
        .map(|attr| {
            let key = decode_name(reader, attr.key.as_ref());
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                Cow::into_owned,
            );
            (key, value)
        })
        .collect();
    Element {
        name: decode_name(reader, e.name().as_ref()),
        attrs,
        ..Element::default()
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "amp" => "&".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

fn decoding_error<P>(text: &str, position: P, reason: impl Into<String>) -> Error
where
    usize: TryFrom<P>,
{
    let offset = usize::try_from(position).unwrap_or(usize::MAX);
    let (line, column) = line_column(text.as_bytes(), offset);
    Error::Decoding {
        line,
        column,
        reason: reason.into(),
    }
}

/// Reads the document element of `text` into an [`Element`] tree.
fn parse_document(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut open: Vec<Element> = Vec::new();
    let mut document: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| decoding_error(text, reader.error_position(), e.to_string()))?;
        let position = reader.buffer_position();

        let finished = match event {
            Event::Start(e) => {
                open.push(open_element(&reader, &e));
                None
            }
            Event::Empty(e) => Some(open_element(&reader, &e)),
            Event::End(_) => open.pop(),
            Event::Text(e) => {
                let chunk = reader.decoder().decode(&e).map_or_else(
                    |_| String::from_utf8_lossy(&e).into_owned(),
                    Cow::into_owned,
                );
                match open.last_mut() {
                    Some(top) => top.text.push_str(&chunk),
                    None if chunk.trim().is_empty() => {}
                    None => {
                        return Err(decoding_error(
                            text,
                            position,
                            "text outside the document element",
                        ))
                    }
                }
                None
            }
            Event::GeneralRef(e) => {
                let entity = decode_name(&reader, &e);
                if let Some(top) = open.last_mut() {
                    top.text.push_str(&decode_entity(&entity));
                }
                None
            }
            Event::CData(e) => {
                if let Some(top) = open.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
                None
            }
            Event::Eof => {
                if let Some(unclosed) = open.last() {
                    return Err(decoding_error(
                        text,
                        position,
                        format!("unclosed element <{}>", unclosed.name),
                    ));
                }
                return document.ok_or_else(|| {
                    decoding_error(text, position, "document has no element")
                });
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => None,
        };

        if let Some(element) = finished {
            match open.last_mut() {
                Some(parent) => parent.children.push(element),
                None if document.is_none() => document = Some(element),
                None => {
                    return Err(decoding_error(
                        text,
                        position,
                        "more than one document element",
                    ))
                }
            }
        }
    }
}

fn parse_kind(name: &str) -> Option<NodeKind> {
    match name {
        "section" => Some(NodeKind::Section),
        "object" => Some(NodeKind::Object),
        "array" => Some(NodeKind::Array),
        "primitive" => Some(NodeKind::Primitive),
        "folder" => Some(NodeKind::Folder),
        "file" => Some(NodeKind::File),
        _ => None,
    }
}

fn restore_scalar(type_name: Option<&str>, text: &str) -> Scalar {
    match type_name {
        Some("null") => Scalar::Null,
        Some("boolean") if text == "true" => Scalar::Bool(true),
        Some("boolean") if text == "false" => Scalar::Bool(false),
        Some("number") => serde_json::from_str::<Number>(text)
            .map_or_else(|_| Scalar::String(text.to_string()), Scalar::Number),
        _ => Scalar::String(text.to_string()),
    }
}

fn content_child(element: &Element) -> Option<&Element> {
    element.children.iter().find(|c| c.name == "content")
}

/// Creates the node for `element`, whose parent sits at `parent_level`.
fn node_for(element: &Element, parent_level: Option<usize>, readback: bool) -> SectionNode {
    let default_level = parent_level.map_or(0, |level| level + 1);

    if !element.is_outline(readback) {
        let has_structure = !element.children.is_empty() || !element.attrs.is_empty();
        return if has_structure {
            SectionNode::new(NodeKind::Object, element.name.clone(), default_level)
        } else if element.text.is_empty() {
            SectionNode::primitive(element.name.clone(), default_level, Scalar::Null)
        } else {
            SectionNode::primitive(
                element.name.clone(),
                default_level,
                Scalar::String(element.text.clone()),
            )
        };
    }

    let title = element.attr("title").unwrap_or_default();
    let kind = element
        .attr("kind")
        .and_then(parse_kind)
        .unwrap_or(NodeKind::Section);
    let level = match parent_level {
        None => 0,
        Some(parent) => element
            .attr("level")
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|&l| l > parent)
            .unwrap_or(default_level),
    };
    let content = content_child(element).map_or("", |c| c.text.as_str());

    let mut node = SectionNode::new(kind, title, level);
    node.id = element.attr("id").unwrap_or_default().to_string();
    node.number = element.attr("number").map(ToString::to_string);
    node.truncated = element.attr("truncated") == Some("true");
    node.body = if kind == NodeKind::Primitive {
        Body::Value(restore_scalar(element.attr("type"), content))
    } else if content.is_empty() {
        Body::default()
    } else {
        Body::Lines(content.split('\n').map(ToString::to_string).collect())
    };
    node
}

/// Leaves and element children that `element` contributes, in document order.
fn child_nodes(element: &Element, readback: bool) -> (Vec<(String, String)>, Vec<&Element>) {
    let outline = element.is_outline(readback);
    let mut leaves: Vec<(String, String)> = element
        .attrs
        .iter()
        .filter(|(k, _)| !(outline && OUTLINE_ATTRS.contains(&k.as_str())))
        .map(|(k, v)| (format!("@{k}"), v.clone()))
        .collect();

    let text = if outline {
        None
    } else if !element.children.is_empty() {
        Some(element.text.trim())
    } else if !element.attrs.is_empty() {
        Some(element.text.as_str())
    } else {
        None
    };
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        leaves.push(("#text".to_string(), text.to_string()));
    }

    let content = if outline {
        element.children.iter().position(|c| c.name == "content")
    } else {
        None
    };
    let elements = element
        .children
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != content)
        .map(|(_, c)| c)
        .collect();
    (leaves, elements)
}

/// Builds a tree from XML text.
///
/// # Errors
///
/// Returns [`Error::Decoding`] with the line of malformed markup, or
/// [`Error::DepthExceeded`] when nesting passes the limit.
pub fn build_tree(text: &str, limits: &Limits) -> Result<SectionTree> {
    let document = parse_document(text)?;
    let readback = document.name == "document" && document.is_outline(true);

    let mut tree = SectionTree::new(NodeKind::Object, "");
    *tree.root_mut() = node_for(&document, None, readback);

    let mut pending: Vec<(NodeId, &Element, usize)> = vec![(ROOT, &document, 0)];
    while let Some((parent, element, depth)) = pending.pop() {
        let (leaves, elements) = child_nodes(element, readback);
        if leaves.is_empty() && elements.is_empty() {
            continue;
        }
        if !limits.admit_children(&mut tree, parent, depth + 1)? {
            continue;
        }

        let parent_level = tree.node(parent).level;
        for (title, value) in leaves {
            let leaf = SectionNode::primitive(title, parent_level + 1, Scalar::String(value));
            tree.add_child(parent, leaf);
        }
        for child in elements {
            let index = tree.add_child(parent, node_for(child, Some(parent_level), readback));
            pending.push((index, child, depth + 1));
        }
    }

    debug!(nodes = tree.node_count(), root = %tree.root().title, readback, "xml descended");
    Ok(tree)
}

#[cfg(test)]
#[path = "../tests/xml.rs"]
mod tests;
