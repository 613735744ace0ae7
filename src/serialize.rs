//! Rendering a finished tree into an output format.
//!
//! Serialization never changes the tree. Each target walks it once and fails only on a
//! value the target has no way to express.

pub mod explorer;
pub mod json;
pub mod xml;

use crate::error::{Error, Result};
use crate::ids::Numbering;
use crate::section::{NodeId, NodeKind, Scalar, SectionTree, ROOT};
use std::str::FromStr;
use tracing::debug;

pub use explorer::{Explorer, ExplorerNode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Output format.
pub enum Target {
    /// Nested outline with ids, levels and kinds.
    #[default]
    Json,
    /// The plain JSON value the tree describes.
    JsonPlain,
    /// Nested elements named by role.
    Xml,
    /// Flat node list for a collapsible tree view.
    Explorer,
}

impl Target {
    #[must_use]
    /// Name used on the command line and in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonPlain => "json-plain",
            Self::Xml => "xml",
            Self::Explorer => "explorer",
        }
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "json-plain" => Ok(Self::JsonPlain),
            "xml" => Ok(Self::Xml),
            "explorer" => Ok(Self::Explorer),
            other => Err(Error::Config(format!("unknown output target {other:?}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Presentation settings shared by the targets.
pub struct SerializeOptions {
    /// Explorer nodes shallower than this depth start expanded (the root is depth 0).
    pub auto_expand_depth: usize,
    /// Drop leading and trailing blank lines from body text.
    pub trim_content: bool,
    /// Longest explorer preview, in characters, before it is cut with `...`.
    pub preview_width: usize,
    /// Wrap JSON outline output in a metadata envelope.
    pub envelope: bool,
    /// Numbering style reported in the envelope.
    pub numbering: Numbering,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            auto_expand_depth: 2,
            trim_content: true,
            preview_width: 200,
            envelope: false,
            numbering: Numbering::Dotted,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A serialized tree.
pub enum Output {
    /// Outline or plain JSON.
    Json(serde_json::Value),
    /// XML document text.
    Xml(String),
    /// Explorer node list.
    Explorer(Explorer),
}

impl Output {
    /// Renders the output as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if JSON encoding fails.
    pub fn to_text(&self, pretty: bool) -> Result<String> {
        let text = match (self, pretty) {
            (Self::Json(value), true) => serde_json::to_string_pretty(value)?,
            (Self::Json(value), false) => serde_json::to_string(value)?,
            (Self::Explorer(explorer), true) => serde_json::to_string_pretty(explorer)?,
            (Self::Explorer(explorer), false) => serde_json::to_string(explorer)?,
            (Self::Xml(text), _) => text.clone(),
        };
        Ok(text)
    }
}

/// Serializes `tree` into `target`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] when a node holds a value `target` cannot carry.
pub fn serialize(tree: &SectionTree, target: Target, options: &SerializeOptions) -> Result<Output> {
    debug!(target = target.as_str(), nodes = tree.node_count(), "serializing");
    match target {
        Target::Json => json::outline(tree, options).map(Output::Json),
        Target::JsonPlain => json::plain(tree, options).map(Output::Json),
        Target::Xml => xml::document(tree, options).map(Output::Xml),
        Target::Explorer => Ok(Output::Explorer(explorer::explorer(tree, options))),
    }
}

/// Role name of a node: `document`, `folder`, `file`, or `section` with one `sub` per
/// enclosing content node.
#[must_use]
pub fn role(tree: &SectionTree, index: NodeId) -> String {
    if index == ROOT {
        return "document".to_string();
    }
    let node = tree.node(index);
    match node.kind {
        NodeKind::Folder => return "folder".to_string(),
        NodeKind::File => return "file".to_string(),
        _ => {}
    }

    let mut nesting = 0;
    let mut current = node.parent_index;
    while let Some(parent) = current {
        if parent == ROOT {
            break;
        }
        let ancestor = tree.node(parent);
        if !matches!(ancestor.kind, NodeKind::Folder | NodeKind::File) {
            nesting += 1;
        }
        current = ancestor.parent_index;
    }
    format!("{}section", "sub".repeat(nesting))
}

fn unsupported(tree: &SectionTree, index: NodeId, scalar: &Scalar, target: Target) -> Error {
    Error::UnsupportedValue {
        id: tree.node(index).id.clone(),
        path: tree.path(index),
        type_name: scalar.type_name(),
        target: target.as_str(),
    }
}

#[cfg(test)]
#[path = "tests/serialize.rs"]
mod tests;
