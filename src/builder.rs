//! Incremental construction of a section tree from classified lines.
//!
//! The builder keeps the chain of open sections from the root to the deepest one. A header
//! closes every open section at its own level or deeper, then opens a new child of whatever
//! remains on top. Nodes are attached to their parent when created, so nothing needs to be
//! done when sections close or when the input ends.

use crate::classify::LineKind;
use crate::error::Result;
use crate::section::{NodeId, NodeKind, SectionNode, SectionTree, ROOT};

/// Single-pass tree builder over a stream of [`LineKind`]s.
pub struct TreeBuilder {
    tree: SectionTree,
    open: Vec<NodeId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    #[must_use]
    /// Starts a tree with an untitled section root.
    pub fn new() -> Self {
        Self {
            tree: SectionTree::new(NodeKind::Section, ""),
            open: vec![ROOT],
        }
    }

    /// Feeds one classified line.
    pub fn push(&mut self, line: LineKind) {
        match line {
            LineKind::Content(text) | LineKind::Blank(text) => {
                let top = self.top();
                self.tree.node_mut(top).push_line(text);
            }
            LineKind::Header {
                level,
                title,
                number,
            } => {
                while self.open.len() > 1 && self.tree.node(self.top()).level >= level {
                    self.open.pop();
                }
                let mut node = SectionNode::section(title, level);
                node.number = number;
                let index = self.tree.add_child(self.top(), node);
                self.open.push(index);
            }
        }
    }

    #[must_use]
    /// Number of sections currently open below the root.
    pub fn open_depth(&self) -> usize {
        self.open.len() - 1
    }

    #[must_use]
    /// Ends the input and hands back the tree.
    pub fn finish(self) -> SectionTree {
        self.tree
    }

    fn top(&self) -> NodeId {
        self.open.last().copied().unwrap_or(ROOT)
    }
}

/// Builds a tree from already classified lines.
pub fn build_tree<I>(lines: I) -> SectionTree
where
    I: IntoIterator<Item = LineKind>,
{
    let mut builder = TreeBuilder::new();
    for line in lines {
        builder.push(line);
    }
    builder.finish()
}

/// Builds a tree from lines whose classification may fail, stopping at the first error.
///
/// # Errors
///
/// Returns the first classification error encountered.
pub fn try_build_tree<I>(lines: I) -> Result<SectionTree>
where
    I: IntoIterator<Item = Result<LineKind>>,
{
    let mut builder = TreeBuilder::new();
    for line in lines {
        builder.push(line?);
    }
    Ok(builder.finish())
}

#[cfg(test)]
#[path = "tests/builder.rs"]
mod tests;
