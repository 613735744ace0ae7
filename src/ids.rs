//! Hierarchical identifiers derived from sibling positions.
//!
//! Every node except the root gets its parent's id, a separator and its 1-based position
//! among its siblings. The numbering style only changes how each position is written, so
//! `1.2.1` and `01.02.01` address the same node of the same tree.

use crate::section::{SectionTree, ROOT};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// How each sibling position is written.
pub enum Numbering {
    /// Plain decimal positions: `1.2.1`.
    #[default]
    Dotted,
    /// Zero-padded positions of at least `width` digits: `01.02`.
    Padded {
        /// Minimum digits per component.
        width: usize,
    },
}

impl Numbering {
    #[must_use]
    /// Writes a single 1-based position.
    pub fn component(self, position: usize) -> String {
        match self {
            Self::Dotted => position.to_string(),
            Self::Padded { width } => format!("{position:0width$}"),
        }
    }

    #[must_use]
    /// Name used in configuration and output metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dotted => "dotted",
            Self::Padded { .. } => "padded",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Numbering style and the separator placed between components.
pub struct NumberingOptions {
    /// Component style.
    pub style: Numbering,
    /// Text between a parent id and a child's component.
    pub separator: String,
}

impl Default for NumberingOptions {
    fn default() -> Self {
        Self {
            style: Numbering::Dotted,
            separator: ".".to_string(),
        }
    }
}

/// Assigns ids to every node below the root in one depth-first pass.
///
/// The root's id is cleared. Running this again on an unchanged tree gives the same ids.
pub fn assign_ids(tree: &mut SectionTree, options: &NumberingOptions) {
    tree.root_mut().id.clear();

    let mut stack = vec![ROOT];
    let mut assigned = 0usize;
    while let Some(parent) = stack.pop() {
        let prefix = tree.node(parent).id.clone();
        let children = tree.node(parent).children_indices.clone();

        for (position, &child) in children.iter().enumerate() {
            let component = options.style.component(position + 1);
            tree.node_mut(child).id = if prefix.is_empty() {
                component
            } else {
                format!("{prefix}{}{component}", options.separator)
            };
            assigned += 1;
        }
        stack.extend(children.into_iter().rev());
    }

    debug!(assigned, style = options.style.as_str(), "assigned ids");
}

#[cfg(test)]
#[path = "tests/ids.rs"]
mod tests;
