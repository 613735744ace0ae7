//! Section tree representation shared by every input format and output target.
//!
//! A tree is an arena of nodes addressed by index. Like the flat section list it grew
//! out of, each node records its parent index and the indices of its children, which keeps
//! the builder's stack of open sections a plain `Vec<NodeId>` and lets the tree-explorer
//! output walk parent/child links without recursion. Node 0 is always the synthetic root.
//!
//! Nodes are only ever appended after their parent, so index order is a valid
//! topological order of the tree.

use serde::Serialize;
use serde_json::Number;

/// Index of a node inside its [`SectionTree`].
pub type NodeId = usize;

/// Index of the synthetic root node.
pub const ROOT: NodeId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Structural role of a node.
pub enum NodeKind {
    /// Header-delimited region of a Markdown document (or the root of one).
    Section,
    /// JSON object or XML element with child elements.
    Object,
    /// JSON array.
    Array,
    /// Scalar leaf.
    Primitive,
    /// Container grouping files in a corpus.
    Folder,
    /// Container holding one document in a corpus.
    File,
}

impl NodeKind {
    #[must_use]
    /// Lowercase name used in every output format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Object => "object",
            Self::Array => "array",
            Self::Primitive => "primitive",
            Self::Folder => "folder",
            Self::File => "file",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Raw value held by a primitive node, keeping its source type.
pub enum Scalar {
    /// JSON `null` or an empty XML element.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// Text.
    String(String),
    /// Opaque bytes supplied through the API; no text format can carry them.
    Binary(Vec<u8>),
}

impl Scalar {
    #[must_use]
    /// Type label used in output metadata and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
        }
    }

    #[must_use]
    /// Human-readable rendering for content and previews.
    pub fn display(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
            Self::Binary(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Content owned directly by a node.
pub enum Body {
    /// Lines accumulated under a header, in source order.
    Lines(Vec<String>),
    /// Scalar value of a primitive node.
    Value(Scalar),
}

impl Default for Body {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl Body {
    #[must_use]
    /// Joins the body into a single string.
    ///
    /// With `trim` set, leading and trailing whitespace-only lines are dropped; the
    /// lines in between are kept verbatim.
    pub fn text(&self, trim: bool) -> String {
        match self {
            Self::Lines(lines) => {
                if !trim {
                    return lines.join("\n");
                }
                let is_blank = |line: &&String| line.trim().is_empty();
                let start = lines.iter().position(|l| !is_blank(&l));
                let end = lines.iter().rposition(|l| !is_blank(&l));
                match (start, end) {
                    (Some(start), Some(end)) => lines[start..=end].join("\n"),
                    _ => String::new(),
                }
            }
            Self::Value(scalar) => scalar.display(),
        }
    }

    #[must_use]
    /// Whether the body holds no lines (a scalar is never empty).
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Lines(lines) if lines.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One node of the hierarchy.
pub struct SectionNode {
    /// Header text or key name; empty for an anonymous root.
    pub title: String,
    /// Nesting depth marker: header level for Markdown, depth from the root otherwise.
    pub level: usize,
    /// Structural role.
    pub kind: NodeKind,
    /// Outline number written in the header text, e.g. `1.2` in `## 1.2 Setup`.
    pub number: Option<String>,
    /// Content directly under this node.
    pub body: Body,
    /// Hierarchical identifier, empty until ids are assigned.
    pub id: String,
    /// Set when the depth limit dropped this node's children.
    pub truncated: bool,
    /// Index of the containing node, `None` for the root.
    pub parent_index: Option<NodeId>,
    /// Indices of directly nested nodes in source order.
    pub children_indices: Vec<NodeId>,
}

impl SectionNode {
    #[must_use]
    /// Creates a detached node with an empty body.
    pub fn new(kind: NodeKind, title: impl Into<String>, level: usize) -> Self {
        Self {
            title: title.into(),
            level,
            kind,
            number: None,
            body: Body::default(),
            id: String::new(),
            truncated: false,
            parent_index: None,
            children_indices: Vec::new(),
        }
    }

    #[must_use]
    /// Creates a Markdown section node.
    pub fn section(title: impl Into<String>, level: usize) -> Self {
        Self::new(NodeKind::Section, title, level)
    }

    #[must_use]
    /// Creates a primitive leaf holding `value`.
    pub fn primitive(title: impl Into<String>, level: usize, value: Scalar) -> Self {
        Self {
            body: Body::Value(value),
            ..Self::new(NodeKind::Primitive, title, level)
        }
    }

    /// Appends one content line to the body.
    pub fn push_line(&mut self, line: impl Into<String>) {
        match &mut self.body {
            Body::Lines(lines) => lines.push(line.into()),
            Body::Value(_) => self.body = Body::Lines(vec![line.into()]),
        }
    }

    #[must_use]
    /// Scalar value of a primitive node.
    pub fn value(&self) -> Option<&Scalar> {
        match &self.body {
            Body::Value(scalar) => Some(scalar),
            Body::Lines(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// Shape summary of a tree, reported in logs and JSON envelopes.
pub struct TreeStats {
    /// Number of nodes excluding the root.
    pub total_nodes: usize,
    /// Deepest structural depth (root is 0).
    pub max_depth: usize,
    /// Count of section nodes.
    pub sections: usize,
    /// Count of object nodes.
    pub objects: usize,
    /// Count of array nodes.
    pub arrays: usize,
    /// Count of primitive nodes.
    pub primitives: usize,
    /// Count of folder nodes.
    pub folders: usize,
    /// Count of file nodes.
    pub files: usize,
}

#[derive(Clone, Debug, PartialEq)]
/// Arena holding a root node and all of its descendants.
pub struct SectionTree {
    nodes: Vec<SectionNode>,
}

impl SectionTree {
    #[must_use]
    /// Creates a tree containing only a level-0 root.
    pub fn new(kind: NodeKind, title: impl Into<String>) -> Self {
        Self {
            nodes: vec![SectionNode::new(kind, title, 0)],
        }
    }

    #[must_use]
    /// The synthetic root.
    pub fn root(&self) -> &SectionNode {
        &self.nodes[ROOT]
    }

    /// Mutable access to the root.
    pub fn root_mut(&mut self) -> &mut SectionNode {
        &mut self.nodes[ROOT]
    }

    #[must_use]
    /// Node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    pub fn node(&self, index: NodeId) -> &SectionNode {
        &self.nodes[index]
    }

    /// Mutable node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    pub fn node_mut(&mut self, index: NodeId) -> &mut SectionNode {
        &mut self.nodes[index]
    }

    #[must_use]
    /// All nodes in creation order, root first.
    pub fn nodes(&self) -> &[SectionNode] {
        &self.nodes
    }

    #[must_use]
    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Attaches `node` as the last child of `parent` and returns its index.
    pub fn add_child(&mut self, parent: NodeId, mut node: SectionNode) -> NodeId {
        let index = self.nodes.len();
        node.parent_index = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children_indices.push(index);
        index
    }

    /// Iterates over the children of `index` in source order.
    pub fn children(&self, index: NodeId) -> impl Iterator<Item = (NodeId, &SectionNode)> {
        self.nodes[index]
            .children_indices
            .iter()
            .map(move |&child| (child, &self.nodes[child]))
    }

    #[must_use]
    /// Indices in depth-first pre-order, root first.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children_indices.iter().rev());
        }
        order
    }

    #[must_use]
    /// Structural depth of a node (number of ancestors).
    pub fn depth(&self, index: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[index].parent_index;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent_index;
        }
        depth
    }

    #[must_use]
    /// Slash-separated title path locating a node, `/` for the root.
    pub fn path(&self, index: NodeId) -> String {
        let mut titles = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            if i != ROOT {
                titles.push(self.nodes[i].title.as_str());
            }
            current = self.nodes[i].parent_index;
        }
        titles.reverse();
        format!("/{}", titles.join("/"))
    }

    #[must_use]
    /// Finds a node by its assigned hierarchical id.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.nodes.iter().position(|node| node.id == id)
    }

    #[must_use]
    /// Counts nodes by kind and measures depth.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut depths = vec![0usize; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate().skip(1) {
            if let Some(parent) = node.parent_index {
                depths[index] = depths[parent] + 1;
            }
            stats.max_depth = stats.max_depth.max(depths[index]);
            stats.total_nodes += 1;
            match node.kind {
                NodeKind::Section => stats.sections += 1,
                NodeKind::Object => stats.objects += 1,
                NodeKind::Array => stats.arrays += 1,
                NodeKind::Primitive => stats.primitives += 1,
                NodeKind::Folder => stats.folders += 1,
                NodeKind::File => stats.files += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
