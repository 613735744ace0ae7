use super::{build_tree, try_build_tree, TreeBuilder};
use crate::classify::{classify_lines, ClassifyOptions, HeaderPolicy, LineKind};
use crate::error::Error;
use crate::section::{Body, SectionTree, ROOT};

fn build(lines: &[&str]) -> SectionTree {
    try_build_tree(classify_lines(lines, &ClassifyOptions::default())).unwrap()
}

fn titles(tree: &SectionTree, parent: usize) -> Vec<String> {
    tree.children(parent).map(|(_, n)| n.title.clone()).collect()
}

fn lines(items: &[&str]) -> Body {
    Body::Lines(items.iter().map(ToString::to_string).collect())
}

#[test]
fn test_example_document() {
    let tree = build(&["# A", "x", "## B", "y", "# C", "z"]);

    assert_eq!(titles(&tree, ROOT), vec!["A", "C"]);
    let a = tree.root().children_indices[0];
    let c = tree.root().children_indices[1];

    assert_eq!(tree.node(a).level, 1);
    assert_eq!(tree.node(a).body, lines(&["x"]));
    assert_eq!(titles(&tree, a), vec!["B"]);

    let b = tree.node(a).children_indices[0];
    assert_eq!(tree.node(b).level, 2);
    assert_eq!(tree.node(b).body, lines(&["y"]));

    assert_eq!(tree.node(c).body, lines(&["z"]));
    assert!(tree.node(c).children_indices.is_empty());
    assert!(tree.root().body.is_empty(), "Root owns no body here");
}

#[test]
fn test_level_skip_nests_directly() {
    let tree = build(&["# Top", "### Deep", "text"]);

    let top = tree.root().children_indices[0];
    assert_eq!(titles(&tree, top), vec!["Deep"]);
    let deep = tree.node(top).children_indices[0];
    assert_eq!(tree.node(deep).level, 3);
    assert_eq!(tree.node_count(), 3, "No intermediate H2 is fabricated");
}

#[test]
fn test_backtracking_closes_deeper_sections() {
    let tree = build(&["# A", "### A1", "## A2", "#### A2a", "# B"]);

    let a = tree.root().children_indices[0];
    assert_eq!(titles(&tree, ROOT), vec!["A", "B"]);
    assert_eq!(titles(&tree, a), vec!["A1", "A2"], "H2 closes the H3 and joins A");
    let a2 = tree.node(a).children_indices[1];
    assert_eq!(titles(&tree, a2), vec!["A2a"]);
}

#[test]
fn test_shallower_header_after_skip_becomes_sibling() {
    let tree = build(&["# A", "### B", "## C"]);

    let a = tree.root().children_indices[0];
    let levels: Vec<usize> = tree.children(a).map(|(_, n)| n.level).collect();
    assert_eq!(titles(&tree, a), vec!["B", "C"]);
    assert_eq!(levels, vec![3, 2]);
}

#[test]
fn test_no_headers_keeps_whole_text_on_root() {
    let text = "first line\n\n  indented\nlast\n";
    let tree = build(&text.split('\n').collect::<Vec<_>>());

    assert!(tree.root().children_indices.is_empty());
    assert_eq!(tree.root().body.text(false), text);
}

#[test]
fn test_orphan_content_before_first_header_stays_on_root() {
    let tree = build(&["preamble", "", "# Title", "body"]);

    assert_eq!(tree.root().body, lines(&["preamble", ""]));
    assert_eq!(titles(&tree, ROOT), vec!["Title"]);
}

#[test]
fn test_blank_lines_are_preserved_in_bodies() {
    let tree = build(&["# A", "", "para one", "", "para two", ""]);

    let a = tree.root().children_indices[0];
    assert_eq!(tree.node(a).body, lines(&["", "para one", "", "para two", ""]));
}

#[test]
fn test_malformed_headers_become_content() {
    let tree = build(&["# A", "#notaheader", "####### seven"]);

    let a = tree.root().children_indices[0];
    assert_eq!(tree.node(a).body, lines(&["#notaheader", "####### seven"]));
    assert_eq!(tree.node_count(), 2);
}

#[test]
fn test_strict_policy_error_stops_the_build() {
    let options = ClassifyOptions {
        policy: HeaderPolicy::Strict,
        ..ClassifyOptions::default()
    };
    let result = try_build_tree(classify_lines(["# A", "ok", "#bad"], &options));

    assert!(matches!(result, Err(Error::MalformedHeader { line: 3, .. })));
}

#[test]
fn test_sibling_order_matches_source() {
    let names = ["Zeta", "Alpha", "Mu", "Beta"];
    let headers: Vec<String> = names.iter().map(|n| format!("## {n}")).collect();
    let tree = build(&headers.iter().map(String::as_str).collect::<Vec<_>>());

    assert_eq!(titles(&tree, ROOT), names);
}

#[test]
fn test_incremental_push_tracks_open_depth() {
    let mut builder = TreeBuilder::new();
    assert_eq!(builder.open_depth(), 0);

    builder.push(LineKind::Header {
        level: 1,
        title: "A".into(),
        number: None,
    });
    builder.push(LineKind::Header {
        level: 4,
        title: "B".into(),
        number: Some("1.1".into()),
    });
    assert_eq!(builder.open_depth(), 2);

    builder.push(LineKind::Header {
        level: 2,
        title: "C".into(),
        number: None,
    });
    assert_eq!(builder.open_depth(), 2, "B closed, C opened under A");

    let tree = builder.finish();
    assert_eq!(tree.node(2).number.as_deref(), Some("1.1"));
}

#[test]
fn test_build_tree_from_plain_kinds() {
    let tree = build_tree(vec![
        LineKind::Content("loose".into()),
        LineKind::Blank(String::new()),
    ]);

    assert_eq!(tree.root().body, lines(&["loose", ""]));
}
