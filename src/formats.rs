//! Input formats and the pieces they share.
//!
//! Markdown is read line by line through the classifier and builder. JSON and XML are
//! read by structural descent, bounded by [`Limits`]. The [`Format`] trait abstracts
//! over tree-sitter grammars so that syntax-aware header detection can ask a real
//! parser which rows hold headings.

pub mod json;
pub mod markdown;
pub mod xml;

use crate::config::Options;
use crate::error::{Error, Result};
use crate::section::{NodeId, SectionTree};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use streaming_iterator::StreamingIterator;
use tracing::{debug, warn};
use tree_sitter::{Parser, Query, QueryCursor};

/// Tree-sitter grammar and the query locating section headings in it.
pub trait Format {
    /// Grammar used to parse the document.
    fn language(&self) -> tree_sitter::Language;
    /// Query whose captures are section headings.
    fn section_query(&self) -> &str;
}

/// Parses `source` with `format` and returns the 0-based rows where headings start.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the grammar or query cannot be loaded.
pub fn heading_rows<F: Format + ?Sized>(format: &F, source: &str) -> Result<BTreeSet<usize>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| Error::Syntax(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Syntax("parser returned no tree".to_string()))?;
    let query =
        Query::new(&language, format.section_query()).map_err(|e| Error::Syntax(e.to_string()))?;

    let mut rows = BTreeSet::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            rows.insert(capture.node.start_position().row);
        }
    }
    debug!(headings = rows.len(), "tree-sitter heading scan");
    Ok(rows)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Supported input document types.
pub enum InputFormat {
    /// Markdown with `#`-style headers.
    Markdown,
    /// Any JSON document.
    Json,
    /// Any well-formed XML document.
    Xml,
}

impl InputFormat {
    #[must_use]
    /// Picks a format from the file extension, if it is a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    #[must_use]
    /// Guesses a format from the first non-whitespace byte.
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{' | b'[') => Self::Json,
            Some(b'<') => Self::Xml,
            _ => Self::Markdown,
        }
    }

    #[must_use]
    /// Name used on the command line and in output metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(Error::Config(format!("unknown input format {other:?}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What happens when structured input nests past [`Limits::max_depth`].
pub enum Overflow {
    /// Fail with [`Error::DepthExceeded`].
    #[default]
    Error,
    /// Keep the container at the limit, drop its children and flag it `truncated`.
    Truncate,
}

impl FromStr for Overflow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "error" => Ok(Self::Error),
            "truncate" => Ok(Self::Truncate),
            other => Err(Error::Config(format!(
                "unknown depth overflow {other:?} (expected \"error\" or \"truncate\")"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Bounds on structural descent into JSON and XML.
pub struct Limits {
    /// Deepest node depth allowed below the root.
    pub max_depth: usize,
    /// Behaviour past the limit.
    pub overflow: Overflow,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            overflow: Overflow::Error,
        }
    }
}

impl Limits {
    /// Decides whether `container` may receive children at `child_depth`.
    ///
    /// Under [`Overflow::Truncate`] a refused container is marked truncated.
    pub(crate) fn admit_children(
        &self,
        tree: &mut SectionTree,
        container: NodeId,
        child_depth: usize,
    ) -> Result<bool> {
        if child_depth <= self.max_depth {
            return Ok(true);
        }
        match self.overflow {
            Overflow::Error => Err(Error::DepthExceeded {
                path: tree.path(container),
                limit: self.max_depth,
            }),
            Overflow::Truncate => {
                warn!(path = %tree.path(container), limit = self.max_depth, "children dropped past depth limit");
                tree.node_mut(container).truncated = true;
                Ok(false)
            }
        }
    }
}

/// Decodes a whole document as UTF-8, locating the first bad byte.
pub(crate) fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| {
        let (line, column) = line_column(bytes, e.valid_up_to());
        Error::Decoding {
            line,
            column,
            reason: e.to_string(),
        }
    })
}

/// 1-based line and byte column of `offset` in `bytes`.
pub(crate) fn line_column(bytes: &[u8], offset: usize) -> (usize, usize) {
    let before = &bytes[..offset.min(bytes.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(before.len(), |newline| before.len() - newline - 1)
        + 1;
    (line, column)
}

/// Builds a section tree from raw input in the given format.
///
/// # Errors
///
/// Returns decoding, header policy, depth limit and syntax errors from the format's builder.
pub fn build(bytes: &[u8], format: InputFormat, options: &Options) -> Result<SectionTree> {
    let tree = match format {
        InputFormat::Markdown => markdown::build_tree_from_bytes(bytes, &options.markdown)?,
        InputFormat::Json => json::parse_tree(decode_utf8(bytes)?, &options.limits)?,
        InputFormat::Xml => xml::build_tree(decode_utf8(bytes)?, &options.limits)?,
    };
    let stats = tree.stats();
    debug!(
        format = format.as_str(),
        nodes = stats.total_nodes,
        max_depth = stats.max_depth,
        "built tree"
    );
    Ok(tree)
}

#[cfg(test)]
#[path = "tests/formats.rs"]
mod tests;
