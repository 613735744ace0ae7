//! Markdown input using `#`-style headers.
//!
//! Plain mode classifies every line on its own. Syntax-aware mode first asks tree-sitter-md
//! which rows are ATX headings, so header-looking lines inside fenced code blocks stay
//! content.

use crate::builder::TreeBuilder;
use crate::classify::{classify_line, ClassifyOptions, LineKind};
use crate::error::{Error, Result};
use crate::formats::{heading_rows, Format};
use crate::section::SectionTree;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Tree-sitter query for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &str {
        "(atx_heading) @heading"
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Handling of a line that is not valid UTF-8.
pub enum DecodePolicy {
    /// Fail with [`Error::Decoding`] naming the line.
    #[default]
    Abort,
    /// Replace the whole line with the given text.
    Placeholder(String),
    /// Replace invalid sequences with U+FFFD.
    Lossy,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Settings for reading Markdown.
pub struct MarkdownOptions {
    /// Header detection.
    pub classify: ClassifyOptions,
    /// Invalid UTF-8 handling for byte input.
    pub decode: DecodePolicy,
    /// Confirm headers with tree-sitter before classifying them.
    pub syntax_aware: bool,
}

/// Builds a section tree from Markdown text.
///
/// Lines are split on `\n` only, so joining every body back together reproduces the
/// input exactly when there are no headers.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] under the strict header policy, and
/// [`Error::Syntax`] or [`Error::Config`] when syntax-aware mode cannot run.
pub fn build_tree(text: &str, options: &MarkdownOptions) -> Result<SectionTree> {
    let lines: Vec<&str> = text.split('\n').collect();
    build_lines(&lines, Some(text), options)
}

/// Builds a section tree from bytes, decoding one line at a time.
///
/// # Errors
///
/// Besides the errors of [`build_tree`], returns [`Error::Decoding`] for an invalid line
/// under [`DecodePolicy::Abort`].
pub fn build_tree_from_bytes(bytes: &[u8], options: &MarkdownOptions) -> Result<SectionTree> {
    let mut lines = Vec::new();
    for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => Cow::Borrowed(line),
            Err(e) => match &options.decode {
                DecodePolicy::Abort => {
                    return Err(Error::Decoding {
                        line: index + 1,
                        column: e.valid_up_to() + 1,
                        reason: e.to_string(),
                    })
                }
                DecodePolicy::Placeholder(text) => {
                    warn!(line = index + 1, "undecodable line replaced by placeholder");
                    Cow::Owned(text.clone())
                }
                DecodePolicy::Lossy => {
                    warn!(line = index + 1, "undecodable bytes replaced");
                    String::from_utf8_lossy(raw)
                }
            },
        };
        lines.push(line);
    }
    build_lines(&lines, None, options)
}

fn build_lines<S: AsRef<str>>(
    lines: &[S],
    source: Option<&str>,
    options: &MarkdownOptions,
) -> Result<SectionTree> {
    let headings = if options.syntax_aware {
        if options.classify.marker != '#' {
            return Err(Error::Config(format!(
                "syntax-aware parsing needs the '#' header marker, not {:?}",
                options.classify.marker
            )));
        }
        let joined;
        let source = if let Some(source) = source {
            source
        } else {
            let parts: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
            joined = parts.join("\n");
            &joined
        };
        Some(heading_rows(&MarkdownFormat, source)?)
    } else {
        None
    };

    let mut builder = TreeBuilder::new();
    for (row, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let kind = match &headings {
            Some(rows) if !rows.contains(&row) => LineKind::text(line),
            _ => classify_line(line, row + 1, &options.classify)?,
        };
        builder.push(kind);
    }
    let tree = builder.finish();
    debug!(
        lines = lines.len(),
        sections = tree.node_count() - 1,
        syntax_aware = options.syntax_aware,
        "markdown parsed"
    );
    Ok(tree)
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
