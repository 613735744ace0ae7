//! Classification of single Markdown lines into headers, content and blanks.
//!
//! A header is up to three spaces of indentation, one to six marker characters, at least
//! one whitespace character and a non-empty title, optionally followed by a closing run of
//! markers. Anything that starts with the marker but misses one of those requirements is a
//! malformed header, and the [`HeaderPolicy`] decides whether that is inert text or an error.

use crate::error::{Error, Result};
use std::str::FromStr;
use tracing::trace;

/// Deepest header level Markdown can express.
pub const MAX_LEVEL: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What to do with a line that looks like a header but is not a valid one.
pub enum HeaderPolicy {
    /// Treat it as ordinary content.
    #[default]
    Lenient,
    /// Reject the document with [`Error::MalformedHeader`].
    Strict,
}

impl FromStr for HeaderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(Error::Config(format!(
                "unknown header policy {other:?} (expected \"lenient\" or \"strict\")"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Settings for header detection.
pub struct ClassifyOptions {
    /// Repeated character that introduces a header.
    pub marker: char,
    /// Handling of malformed headers.
    pub policy: HeaderPolicy,
    /// Split a leading outline number such as `1.2` off the title.
    pub extract_numbers: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            marker: '#',
            policy: HeaderPolicy::Lenient,
            extract_numbers: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Role of one input line.
pub enum LineKind {
    /// Header opening a section.
    Header {
        /// Number of markers, 1 to [`MAX_LEVEL`].
        level: usize,
        /// Header text without markers.
        title: String,
        /// Outline number found at the start of the header text.
        number: Option<String>,
    },
    /// Body text, kept verbatim.
    Content(String),
    /// Whitespace-only line, kept verbatim so bodies can be reassembled exactly.
    Blank(String),
}

impl LineKind {
    #[must_use]
    /// Classifies a line as content or blank without looking for a header.
    pub fn text(line: &str) -> Self {
        if line.trim().is_empty() {
            Self::Blank(line.to_string())
        } else {
            Self::Content(line.to_string())
        }
    }
}

enum Candidate<'a> {
    NotHeader,
    Malformed,
    Header { level: usize, text: &'a str },
}

/// Classifies `line`, the 1-based `line_number`-th line of its document.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] under [`HeaderPolicy::Strict`] when the line starts
/// with the marker but is not a valid header.
pub fn classify_line(line: &str, line_number: usize, options: &ClassifyOptions) -> Result<LineKind> {
    let stripped = line.strip_suffix('\r').unwrap_or(line);
    if stripped.trim().is_empty() {
        return Ok(LineKind::Blank(line.to_string()));
    }

    match parse_header(stripped, options.marker) {
        Candidate::NotHeader => Ok(LineKind::Content(line.to_string())),
        Candidate::Malformed => match options.policy {
            HeaderPolicy::Lenient => {
                trace!(line = line_number, "malformed header kept as content");
                Ok(LineKind::Content(line.to_string()))
            }
            HeaderPolicy::Strict => Err(Error::MalformedHeader {
                line: line_number,
                text: line.to_string(),
            }),
        },
        Candidate::Header { level, text } => {
            let (number, title) = if options.extract_numbers {
                split_number(text)
            } else {
                (None, text.to_string())
            };
            Ok(LineKind::Header {
                level,
                title,
                number,
            })
        }
    }
}

fn parse_header(line: &str, marker: char) -> Candidate<'_> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return Candidate::NotHeader;
    }

    let level = rest.chars().take_while(|&c| c == marker).count();
    if level == 0 {
        return Candidate::NotHeader;
    }
    if level > MAX_LEVEL {
        return Candidate::Malformed;
    }

    let after = &rest[level * marker.len_utf8()..];
    if !after.starts_with(char::is_whitespace) {
        return Candidate::Malformed;
    }

    let text = strip_closing_markers(after.trim(), marker);
    if text.is_empty() {
        Candidate::Malformed
    } else {
        Candidate::Header { level, text }
    }
}

/// Drops a trailing `##`-style run when it is separated from the title by whitespace.
fn strip_closing_markers(text: &str, marker: char) -> &str {
    let without = text.trim_end_matches(marker);
    if without.len() == text.len() {
        text
    } else if without.is_empty() || without.ends_with(char::is_whitespace) {
        without.trim_end()
    } else {
        text
    }
}

/// Splits `1.2.3 Title` into `("1.2.3", "Title")`. Needs at least two numeric components.
fn split_number(text: &str) -> (Option<String>, String) {
    let Some((head, rest)) = text.split_once(char::is_whitespace) else {
        return (None, text.to_string());
    };
    let rest = rest.trim_start();
    let mut parts = head.split('.');
    let numeric = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let components = parts.clone().count();

    if components >= 2 && parts.all(numeric) && !rest.is_empty() {
        (Some(head.to_string()), rest.to_string())
    } else {
        (None, text.to_string())
    }
}

/// Lazily classifies a sequence of lines, numbering them from 1.
pub struct Classified<'o, I> {
    lines: I,
    options: &'o ClassifyOptions,
    line_number: usize,
}

impl<I, S> Iterator for Classified<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<LineKind>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(classify_line(line.as_ref(), self.line_number, self.options))
    }
}

/// Wraps `lines` in a lazy classifier.
pub fn classify_lines<I, S>(lines: I, options: &ClassifyOptions) -> Classified<'_, I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Classified {
        lines: lines.into_iter(),
        options,
        line_number: 0,
    }
}

#[cfg(test)]
#[path = "tests/classify.rs"]
mod tests;
