//! Several documents gathered into one tree.
//!
//! A corpus root holds `folder` nodes, each folder holds `file` nodes, and each file
//! carries a grafted copy of one document tree. Grafted levels are shifted below the file,
//! so every node stays deeper than its parent and ids read `folder.file.section`.

use crate::section::{NodeId, NodeKind, SectionNode, SectionTree, ROOT};
use tracing::debug;

/// Splits an ordered folder name such as `01.Intro` into `("01", "Intro")`.
#[must_use]
pub fn split_folder_name(name: &str) -> (Option<String>, String) {
    match name.split_once('.') {
        Some((number, rest))
            if !number.is_empty()
                && number.bytes().all(|b| b.is_ascii_digit())
                && !rest.trim().is_empty() =>
        {
            (Some(number.to_string()), rest.trim().to_string())
        }
        _ => (None, name.to_string()),
    }
}

/// Builder for a folder/file tree.
pub struct Corpus {
    tree: SectionTree,
}

impl Corpus {
    #[must_use]
    /// Starts an empty corpus whose root is titled `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            tree: SectionTree::new(NodeKind::Folder, title),
        }
    }

    /// Appends a folder below the root.
    pub fn add_folder(&mut self, name: &str) -> NodeId {
        let (number, title) = split_folder_name(name);
        let mut folder = SectionNode::new(NodeKind::Folder, title, 1);
        folder.number = number;
        self.tree.add_child(ROOT, folder)
    }

    /// Returns the folder with this name, adding it if it does not exist yet.
    pub fn find_or_add_folder(&mut self, name: &str) -> NodeId {
        let (number, title) = split_folder_name(name);
        let existing = self
            .tree
            .children(ROOT)
            .find(|(_, n)| n.title == title && n.number == number)
            .map(|(index, _)| index);
        existing.unwrap_or_else(|| self.add_folder(name))
    }

    /// Appends a file to `folder` and grafts `document` beneath it.
    ///
    /// The document root's body becomes the file's body and its children become the
    /// file's children, with their levels shifted below the file.
    pub fn add_file(&mut self, folder: NodeId, name: &str, document: &SectionTree) -> NodeId {
        let level = self.tree.node(folder).level + 1;
        let mut file = SectionNode::new(NodeKind::File, name, level);
        file.body = document.root().body.clone();
        let file_index = self.tree.add_child(folder, file);

        // Parents precede children in the arena, so one forward pass can remap them.
        let mut mapped = vec![file_index; document.node_count()];
        for (old, node) in document.nodes().iter().enumerate().skip(1) {
            let parent = node.parent_index.map_or(file_index, |p| mapped[p]);
            let mut copy = node.clone();
            copy.level += level;
            copy.parent_index = None;
            copy.children_indices.clear();
            mapped[old] = self.tree.add_child(parent, copy);
        }

        debug!(file = name, nodes = document.node_count() - 1, "grafted document");
        file_index
    }

    #[must_use]
    /// The tree built so far.
    pub fn tree(&self) -> &SectionTree {
        &self.tree
    }

    #[must_use]
    /// Finishes the corpus.
    pub fn into_tree(self) -> SectionTree {
        self.tree
    }
}

#[cfg(test)]
#[path = "tests/corpus.rs"]
mod tests;
