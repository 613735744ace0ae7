//! sectree: header-based section trees for Markdown, JSON and XML.
//!
//! Flat text with nesting markers goes in, a normalized tree with stable hierarchical ids
//! comes out. The pipeline has four separate stages:
//!
//! 1. [`classify`] decides whether a Markdown line is a header, content or blank;
//! 2. [`builder`] (and the JSON/XML readers in [`formats`]) build a [`SectionTree`];
//! 3. [`ids`] assigns ids such as `1.2.1` or `01.02.01`;
//! 4. [`serialize`] renders outline JSON, plain JSON, XML or a tree-explorer list.
//!
//! [`corpus`] gathers several documents into a folder/file tree, and [`config`] turns a
//! `sectree.toml` file into the [`Options`] every stage takes.

pub mod builder;
pub mod classify;
pub mod config;
pub mod corpus;
pub mod error;
pub mod formats;
pub mod ids;
pub mod section;
pub mod serialize;

pub use config::{Config, Options};
pub use error::{Error, Result};
pub use formats::InputFormat;
pub use ids::assign_ids;
pub use section::{NodeKind, SectionNode, SectionTree};
pub use serialize::{serialize, Output, Target};

/// Runs the whole pipeline: build, assign ids, serialize.
///
/// # Errors
///
/// Returns the first error raised by any stage.
pub fn convert(input: &[u8], format: InputFormat, target: Target, options: &Options) -> Result<Output> {
    let mut tree = formats::build(input, format, options)?;
    assign_ids(&mut tree, &options.numbering);
    serialize(&tree, target, &options.serialize)
}

#[cfg(test)]
#[path = "tests/pipeline.rs"]
mod tests;
