//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a sectree.toml, and if present we load settings from there.
//! Every field has a default, so a partial file is fine. Choices are kept as plain strings
//! in the file and validated into typed [`Options`] in one place.

use crate::classify::{ClassifyOptions, HeaderPolicy};
use crate::error::{Error, Result};
use crate::formats::markdown::{DecodePolicy, MarkdownOptions};
use crate::formats::{Limits, Overflow};
use crate::ids::{Numbering, NumberingOptions};
use crate::serialize::SerializeOptions;
use facet::Facet;
use std::fs;
use std::path::Path;

/// File looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE: &str = "sectree.toml";

/// Widest padded id component; `usize` positions never need more digits.
pub const MAX_ID_WIDTH: usize = 20;

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from sectree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "dotted".to_string())]
    /// Id style: "dotted" or "padded".
    pub numbering: String,
    #[facet(default = 2)]
    /// Minimum digits per id component with padded numbering.
    pub id_width: usize,
    #[facet(default = ".".to_string())]
    /// Text between id components.
    pub separator: String,
    #[facet(default = 2)]
    /// Explorer nodes shallower than this start expanded.
    pub auto_expand_depth: usize,
    #[facet(default = "lenient".to_string())]
    /// Malformed header handling: "lenient" or "strict".
    pub header_policy: String,
    #[facet(default = "#".to_string())]
    /// Single character that introduces a Markdown header.
    pub header_marker: String,
    #[facet(default = true)]
    /// Split outline numbers like `1.2` off header titles.
    pub extract_numbers: bool,
    #[facet(default = false)]
    /// Confirm headers with tree-sitter so fenced code is never split.
    pub syntax_aware: bool,
    #[facet(default = "abort".to_string())]
    /// Invalid UTF-8 handling: "abort", "placeholder" or "lossy".
    pub decode_policy: String,
    #[facet(default = "[undecodable line]".to_string())]
    /// Replacement line for the placeholder decode policy.
    pub placeholder: String,
    #[facet(default = 64)]
    /// Deepest JSON/XML nesting to descend into.
    pub max_depth: usize,
    #[facet(default = "error".to_string())]
    /// Past the depth limit: "error" or "truncate".
    pub depth_overflow: String,
    #[facet(default = true)]
    /// Strip blank lines around body text in output.
    pub trim_content: bool,
    #[facet(default = 200)]
    /// Explorer preview length in characters.
    pub preview_width: usize,
    #[facet(default = false)]
    /// Wrap JSON outline output with metadata.
    pub envelope: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            numbering: "dotted".to_string(),
            id_width: 2,
            separator: ".".to_string(),
            auto_expand_depth: 2,
            header_policy: "lenient".to_string(),
            header_marker: "#".to_string(),
            extract_numbers: true,
            syntax_aware: false,
            decode_policy: "abort".to_string(),
            placeholder: "[undecodable line]".to_string(),
            max_depth: 64,
            depth_overflow: "error".to_string(),
            trim_content: true,
            preview_width: 200,
            envelope: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Typed settings for every pipeline stage.
pub struct Options {
    /// Markdown reading.
    pub markdown: MarkdownOptions,
    /// JSON/XML descent bounds.
    pub limits: Limits,
    /// Id assignment.
    pub numbering: NumberingOptions,
    /// Output rendering.
    pub serialize: SerializeOptions,
}

impl Config {
    /// Load configuration from sectree.toml if present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or mistyped fields.
    pub fn from_toml(contents: &str) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|e| Error::Config(e.to_string()))
    }

    fn numbering_style(&self) -> Result<Numbering> {
        match self.numbering.as_str() {
            "dotted" => Ok(Numbering::Dotted),
            "padded" if self.id_width == 0 => {
                Err(Error::Config("id_width must be at least 1".to_string()))
            }
            "padded" if self.id_width > MAX_ID_WIDTH => Err(Error::Config(format!(
                "id_width must be at most {MAX_ID_WIDTH}, got {}",
                self.id_width
            ))),
            "padded" => Ok(Numbering::Padded {
                width: self.id_width,
            }),
            other => Err(Error::Config(format!(
                "unknown numbering {other:?} (expected \"dotted\" or \"padded\")"
            ))),
        }
    }

    fn marker(&self) -> Result<char> {
        let mut chars = self.header_marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(c),
            _ => Err(Error::Config(format!(
                "header_marker must be one non-space character, got {:?}",
                self.header_marker
            ))),
        }
    }

    fn decode(&self) -> Result<DecodePolicy> {
        match self.decode_policy.as_str() {
            "abort" => Ok(DecodePolicy::Abort),
            "placeholder" => Ok(DecodePolicy::Placeholder(self.placeholder.clone())),
            "lossy" => Ok(DecodePolicy::Lossy),
            other => Err(Error::Config(format!(
                "unknown decode policy {other:?} (expected \"abort\", \"placeholder\" or \"lossy\")"
            ))),
        }
    }

    /// Validates the preferences into typed options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first invalid setting.
    pub fn to_options(&self) -> Result<Options> {
        if self.separator.is_empty() {
            return Err(Error::Config("separator must not be empty".to_string()));
        }
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".to_string()));
        }
        let style = self.numbering_style()?;

        Ok(Options {
            markdown: MarkdownOptions {
                classify: ClassifyOptions {
                    marker: self.marker()?,
                    policy: self.header_policy.parse::<HeaderPolicy>()?,
                    extract_numbers: self.extract_numbers,
                },
                decode: self.decode()?,
                syntax_aware: self.syntax_aware,
            },
            limits: Limits {
                max_depth: self.max_depth,
                overflow: self.depth_overflow.parse::<Overflow>()?,
            },
            numbering: NumberingOptions {
                style,
                separator: self.separator.clone(),
            },
            serialize: SerializeOptions {
                auto_expand_depth: self.auto_expand_depth,
                trim_content: self.trim_content,
                preview_width: self.preview_width,
                envelope: self.envelope,
                numbering: style,
            },
        })
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
