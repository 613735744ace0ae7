//! Tree-explorer target: a flat, addressable node list.
//!
//! A viewer renders the root, follows `children` keys to expand nodes on demand, and uses
//! `parent` to walk back up. Nodes are listed in document order.

use super::SerializeOptions;
use crate::section::{NodeId, NodeKind, SectionTree, ROOT};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One entry of the explorer list.
pub struct ExplorerNode {
    /// Key of this node: its id, `root` for the root, or `n<index>` before ids are assigned.
    pub id: String,
    /// Key of the parent, absent for the root.
    pub parent: Option<String>,
    /// Keys of the children in source order.
    pub children: Vec<String>,
    /// Display title.
    pub title: String,
    /// Node level.
    pub level: usize,
    /// Structural kind.
    pub kind: NodeKind,
    /// Whether the view starts with this node open.
    pub expanded: bool,
    /// Shortened body text or value, absent when there is nothing to show.
    pub preview: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Node list plus the key of its root.
pub struct Explorer {
    /// Key of the root entry.
    pub root: String,
    /// All nodes in document order, root first.
    pub nodes: Vec<ExplorerNode>,
}

fn key(tree: &SectionTree, index: NodeId) -> String {
    let id = &tree.node(index).id;
    if index == ROOT {
        "root".to_string()
    } else if id.is_empty() {
        format!("n{index}")
    } else {
        id.clone()
    }
}

fn preview(text: &str, width: usize) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    if text.chars().count() <= width {
        return Some(text.to_string());
    }
    let mut cut: String = text.chars().take(width).collect();
    cut.push_str("...");
    Some(cut)
}

/// Flattens `tree` into an explorer list.
#[must_use]
pub fn explorer(tree: &SectionTree, options: &SerializeOptions) -> Explorer {
    let mut nodes = Vec::with_capacity(tree.node_count());
    let mut depths = vec![0usize; tree.node_count()];

    for index in tree.preorder() {
        let node = tree.node(index);
        if let Some(parent) = node.parent_index {
            depths[index] = depths[parent] + 1;
        }
        nodes.push(ExplorerNode {
            id: key(tree, index),
            parent: node.parent_index.map(|p| key(tree, p)),
            children: node
                .children_indices
                .iter()
                .map(|&c| key(tree, c))
                .collect(),
            title: node.title.clone(),
            level: node.level,
            kind: node.kind,
            expanded: depths[index] < options.auto_expand_depth,
            preview: preview(&node.body.text(options.trim_content), options.preview_width),
        });
    }

    Explorer {
        root: key(tree, ROOT),
        nodes,
    }
}
