use super::{build_tree, build_tree_from_bytes, DecodePolicy, MarkdownOptions};
use crate::classify::{ClassifyOptions, HeaderPolicy};
use crate::error::Error;
use crate::section::{Body, SectionTree, ROOT};

fn titles(tree: &SectionTree, parent: usize) -> Vec<String> {
    tree.children(parent).map(|(_, n)| n.title.clone()).collect()
}

#[test]
fn test_text_round_trips_without_headers() {
    let text = "alpha\r\n\nbeta  \n";
    let tree = build_tree(text, &MarkdownOptions::default()).unwrap();

    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.root().body.text(false), text);
}

#[test]
fn test_example_document_structure() {
    let tree = build_tree("# A\nx\n## B\ny\n# C\nz", &MarkdownOptions::default()).unwrap();

    assert_eq!(titles(&tree, ROOT), vec!["A", "C"]);
    let a = tree.root().children_indices[0];
    assert_eq!(titles(&tree, a), vec!["B"]);
}

#[test]
fn test_invalid_utf8_aborts_with_line_number() {
    let bytes = b"# Title\nfine\nbad \xff byte\n";
    match build_tree_from_bytes(bytes, &MarkdownOptions::default()) {
        Err(Error::Decoding { line, column, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(column, 5, "Column points at the first invalid byte");
        }
        other => panic!("expected decoding error, got {other:?}"),
    }
}

#[test]
fn test_placeholder_policy_substitutes_line() {
    let options = MarkdownOptions {
        decode: DecodePolicy::Placeholder("[unreadable]".to_string()),
        ..MarkdownOptions::default()
    };
    let tree = build_tree_from_bytes(b"# T\n\xc3\x28\nok", &options).unwrap();

    let t = tree.root().children_indices[0];
    assert_eq!(
        tree.node(t).body,
        Body::Lines(vec!["[unreadable]".to_string(), "ok".to_string()])
    );
}

#[test]
fn test_lossy_policy_replaces_bytes() {
    let options = MarkdownOptions {
        decode: DecodePolicy::Lossy,
        ..MarkdownOptions::default()
    };
    let tree = build_tree_from_bytes(b"a\xffb", &options).unwrap();

    assert_eq!(tree.root().body.text(false), "a\u{fffd}b");
}

#[test]
fn test_invalid_header_line_can_still_be_a_header_after_substitution() {
    let options = MarkdownOptions {
        decode: DecodePolicy::Placeholder("# Recovered".to_string()),
        ..MarkdownOptions::default()
    };
    let tree = build_tree_from_bytes(b"\xff", &options).unwrap();

    assert_eq!(titles(&tree, ROOT), vec!["Recovered"]);
}

#[test]
fn test_strict_policy_reports_line() {
    let options = MarkdownOptions {
        classify: ClassifyOptions {
            policy: HeaderPolicy::Strict,
            ..ClassifyOptions::default()
        },
        ..MarkdownOptions::default()
    };
    let result = build_tree("# A\n\n#B", &options);

    assert!(matches!(result, Err(Error::MalformedHeader { line: 3, .. })));
}

#[test]
fn test_fenced_code_headers_depend_on_syntax_awareness() {
    let text = "# Real\n\n```sh\n# comment\n```\n\n## Also real\n";

    let plain = build_tree(text, &MarkdownOptions::default()).unwrap();
    let real = plain.root().children_indices[0];
    assert_eq!(
        titles(&plain, real),
        vec!["comment", "Also real"],
        "Line classifier alone sees the comment as a header"
    );

    let options = MarkdownOptions {
        syntax_aware: true,
        ..MarkdownOptions::default()
    };
    let aware = build_tree(text, &options).unwrap();
    let real = aware.root().children_indices[0];
    assert_eq!(titles(&aware, real), vec!["Also real"]);
    assert!(aware
        .node(real)
        .body
        .text(false)
        .contains("# comment"));
}

#[test]
fn test_syntax_aware_bytes_match_text() {
    let text = "# One\n~~~\n## fenced\n~~~\n# Two\n";
    let options = MarkdownOptions {
        syntax_aware: true,
        ..MarkdownOptions::default()
    };

    let from_text = build_tree(text, &options).unwrap();
    let from_bytes = build_tree_from_bytes(text.as_bytes(), &options).unwrap();
    assert_eq!(from_text, from_bytes);
    assert_eq!(titles(&from_text, ROOT), vec!["One", "Two"]);
}

#[test]
fn test_syntax_aware_requires_hash_marker() {
    let options = MarkdownOptions {
        classify: ClassifyOptions {
            marker: '=',
            ..ClassifyOptions::default()
        },
        syntax_aware: true,
        ..MarkdownOptions::default()
    };

    assert!(matches!(build_tree("= A", &options), Err(Error::Config(_))));
}
