use super::markdown::MarkdownFormat;
use super::{build, decode_utf8, heading_rows, line_column, InputFormat, Overflow};
use crate::config::Options;
use crate::error::Error;
use crate::section::NodeKind;
use std::path::Path;

#[test]
fn test_format_from_extension() {
    assert_eq!(
        InputFormat::from_path(Path::new("notes/README.md")),
        Some(InputFormat::Markdown)
    );
    assert_eq!(
        InputFormat::from_path(Path::new("a.Markdown")),
        Some(InputFormat::Markdown)
    );
    assert_eq!(
        InputFormat::from_path(Path::new("data.JSON")),
        Some(InputFormat::Json)
    );
    assert_eq!(InputFormat::from_path(Path::new("feed.xml")), Some(InputFormat::Xml));
    assert_eq!(InputFormat::from_path(Path::new("notes.txt")), None);
    assert_eq!(InputFormat::from_path(Path::new("Makefile")), None);
}

#[test]
fn test_format_sniffing() {
    assert_eq!(InputFormat::sniff(b"  \n{\"a\": 1}"), InputFormat::Json);
    assert_eq!(InputFormat::sniff(b"[1, 2]"), InputFormat::Json);
    assert_eq!(InputFormat::sniff(b"\n<?xml version=\"1.0\"?><a/>"), InputFormat::Xml);
    assert_eq!(InputFormat::sniff(b"# Title"), InputFormat::Markdown);
    assert_eq!(InputFormat::sniff(b""), InputFormat::Markdown);
}

#[test]
fn test_names_parse() {
    assert_eq!("md".parse::<InputFormat>().unwrap(), InputFormat::Markdown);
    assert_eq!("xml".parse::<InputFormat>().unwrap(), InputFormat::Xml);
    assert!("yaml".parse::<InputFormat>().is_err());
    assert_eq!("truncate".parse::<Overflow>().unwrap(), Overflow::Truncate);
    assert!(matches!("drop".parse::<Overflow>(), Err(Error::Config(_))));
}

#[test]
fn test_line_column() {
    let text = b"ab\ncde\nf";
    assert_eq!(line_column(text, 0), (1, 1));
    assert_eq!(line_column(text, 2), (1, 3));
    assert_eq!(line_column(text, 3), (2, 1));
    assert_eq!(line_column(text, 5), (2, 3));
    assert_eq!(line_column(text, 100), (3, 2), "Offsets past the end clamp");
}

#[test]
fn test_structured_input_must_be_utf8() {
    match decode_utf8(b"{\n\"a\": \"\xff\"}") {
        Err(Error::Decoding { line, column, .. }) => assert_eq!((line, column), (2, 7)),
        other => panic!("expected decoding error, got {other:?}"),
    }
}

#[test]
fn test_heading_rows_skip_fenced_code() {
    let source = "# One\n\n```\n# not a heading\n```\n## Two\n";
    let rows = heading_rows(&MarkdownFormat, source).unwrap();

    assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0, 5]);
}

#[test]
fn test_build_dispatches_on_format() {
    let options = Options::default();

    let md = build(b"# A\ntext", InputFormat::Markdown, &options).unwrap();
    assert_eq!(md.root().kind, NodeKind::Section);

    let json = build(b"{\"a\": [1]}", InputFormat::Json, &options).unwrap();
    assert_eq!(json.root().kind, NodeKind::Object);
    assert_eq!(json.node_count(), 3);

    let xml = build(b"<a><b/></a>", InputFormat::Xml, &options).unwrap();
    assert_eq!(xml.root().title, "a");

    assert!(matches!(
        build(b"{oops", InputFormat::Json, &options),
        Err(Error::Decoding { line: 1, .. })
    ));
}
