//! Error taxonomy for building, numbering and serializing section trees.
//!
//! Structural problems never surface here: every sequence of lines yields some
//! well-formed tree. What can fail is decoding the input, a strict header policy,
//! a structural depth limit, or a target format that cannot represent a value.

/// Errors raised by the conversion pipeline and its I/O glue.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input could not be interpreted as text, JSON or XML.
    #[error("decoding failed at line {line}, column {column}: {reason}")]
    Decoding {
        /// 1-based line of the offending input.
        line: usize,
        /// 1-based column, or 0 when only the line is known.
        column: usize,
        /// Parser or decoder message.
        reason: String,
    },

    /// A header-like line was rejected under the strict header policy.
    #[error("malformed header at line {line}: {text:?}")]
    MalformedHeader {
        /// 1-based line of the header.
        line: usize,
        /// The raw line text.
        text: String,
    },

    /// Structured input nests deeper than the configured limit.
    #[error("nesting deeper than {limit} levels at {path}")]
    DepthExceeded {
        /// Title path of the container whose children would pass the limit.
        path: String,
        /// Configured maximum depth.
        limit: usize,
    },

    /// A node value has no representation in the requested output format.
    #[error("cannot serialize {type_name} value of node {id} ({path}) as {target}")]
    UnsupportedValue {
        /// Hierarchical id of the node (empty if ids were never assigned).
        id: String,
        /// Title path of the node.
        path: String,
        /// Name of the scalar type.
        type_name: &'static str,
        /// Name of the output target.
        target: &'static str,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Tree-sitter could not be set up for syntax-aware parsing.
    #[error("syntax tree error: {0}")]
    Syntax(String),

    /// I/O error from the surrounding tool.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// XML encoding error.
    #[error("XML error")]
    Xml(#[from] quick_xml::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
