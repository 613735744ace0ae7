//! XML target.
//!
//! Each node is an element named by its role, `<document>` for the root. Every element
//! carries a `<content>` child, empty or not, holding the body text or scalar value.

use super::{role, unsupported, SerializeOptions, Target};
use crate::error::{Error, Result};
use crate::section::{Body, NodeId, NodeKind, Scalar, SectionTree, ROOT};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

enum Step {
    Open(NodeId),
    Close(String),
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | ' '..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Returns `text` unless it holds a character no XML document may contain.
fn checked<'a>(tree: &SectionTree, index: NodeId, text: &'a str) -> Result<&'a str> {
    if text.chars().all(is_xml_char) {
        return Ok(text);
    }
    Err(Error::UnsupportedValue {
        id: tree.node(index).id.clone(),
        path: tree.path(index),
        type_name: "string",
        target: Target::Xml.as_str(),
    })
}

fn start_tag(tree: &SectionTree, index: NodeId, name: &str) -> Result<BytesStart<'static>> {
    let node = tree.node(index);
    let mut start = BytesStart::new(name.to_string());
    if index != ROOT {
        start.push_attribute(("id", checked(tree, index, &node.id)?));
    }
    start.push_attribute(("title", checked(tree, index, &node.title)?));
    if index != ROOT {
        start.push_attribute(("level", node.level.to_string().as_str()));
    }
    if node.kind != NodeKind::Section {
        start.push_attribute(("kind", node.kind.as_str()));
    }
    if let Some(scalar) = node.value() {
        if matches!(scalar, Scalar::Binary(_)) {
            return Err(unsupported(tree, index, scalar, Target::Xml));
        }
        start.push_attribute(("type", scalar.type_name()));
    }
    if let Some(number) = &node.number {
        start.push_attribute(("number", checked(tree, index, number)?));
    }
    if node.truncated {
        start.push_attribute(("truncated", "true"));
    }
    Ok(start)
}

fn write_content<W: std::io::Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("content")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("content")))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("content")))?;
    }
    Ok(())
}

/// Writes the tree as an indented XML document.
///
/// # Errors
///
/// Fails on binary values and on text with characters outside XML 1.0, neither of which
/// an XML document can carry.
pub fn document(tree: &SectionTree, options: &SerializeOptions) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut steps = vec![Step::Open(ROOT)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Close(name) => {
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Step::Open(index) => {
                let node = tree.node(index);
                let name = role(tree, index);
                writer.write_event(Event::Start(start_tag(tree, index, &name)?))?;

                let text = match &node.body {
                    Body::Value(scalar) => scalar.display(),
                    Body::Lines(_) => node.body.text(options.trim_content),
                };
                write_content(&mut writer, checked(tree, index, &text)?)?;

                steps.push(Step::Close(name));
                steps.extend(node.children_indices.iter().rev().map(|&c| Step::Open(c)));
            }
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
