use super::{Body, NodeKind, Scalar, SectionNode, SectionTree, ROOT};

fn sample_tree() -> SectionTree {
    let mut tree = SectionTree::new(NodeKind::Section, "");
    let a = tree.add_child(ROOT, SectionNode::section("A", 1));
    tree.add_child(a, SectionNode::section("B", 3));
    tree.add_child(ROOT, SectionNode::section("C", 1));
    tree
}

#[test]
fn test_add_child_links_both_ways() {
    let tree = sample_tree();

    assert_eq!(tree.root().children_indices, vec![1, 3]);
    assert_eq!(tree.node(2).parent_index, Some(1));
    assert_eq!(tree.node(1).children_indices, vec![2]);
    assert_eq!(tree.root().parent_index, None);
}

#[test]
fn test_preorder_follows_source_order() {
    let tree = sample_tree();
    let titles: Vec<&str> = tree
        .preorder()
        .into_iter()
        .map(|i| tree.node(i).title.as_str())
        .collect();

    assert_eq!(titles, vec!["", "A", "B", "C"]);
}

#[test]
fn test_depth_counts_ancestors_not_levels() {
    let tree = sample_tree();

    // B is written as H3 but sits directly under A
    assert_eq!(tree.node(2).level, 3);
    assert_eq!(tree.depth(2), 2);
    assert_eq!(tree.depth(ROOT), 0);
}

#[test]
fn test_path_joins_titles() {
    let tree = sample_tree();

    assert_eq!(tree.path(2), "/A/B");
    assert_eq!(tree.path(ROOT), "/");
}

#[test]
fn test_body_text_trims_blank_runs_only_when_asked() {
    let body = Body::Lines(vec![
        String::new(),
        "first".to_string(),
        String::new(),
        "second".to_string(),
        "  ".to_string(),
    ]);

    assert_eq!(body.text(true), "first\n\nsecond");
    assert_eq!(body.text(false), "\nfirst\n\nsecond\n  ");
    assert_eq!(Body::Lines(vec![String::new()]).text(true), "");
}

#[test]
fn test_scalar_display_and_type_names() {
    assert_eq!(Scalar::Null.display(), "null");
    assert_eq!(Scalar::Bool(true).display(), "true");
    assert_eq!(Scalar::Number(7.into()).display(), "7");
    assert_eq!(Scalar::Binary(vec![1, 2, 3]).display(), "<3 bytes>");
    assert_eq!(Scalar::String("x".into()).type_name(), "string");
}

#[test]
fn test_push_line_onto_primitive_replaces_value() {
    let mut node = SectionNode::primitive("k", 1, Scalar::Null);
    node.push_line("text");

    assert_eq!(node.body, Body::Lines(vec!["text".to_string()]));
    assert!(node.value().is_none());
}

#[test]
fn test_stats_counts_kinds_and_depth() {
    let tree = sample_tree();
    let stats = tree.stats();

    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.sections, 3);
    assert_eq!(stats.max_depth, 2);
    assert_eq!(stats.primitives, 0);
}

#[test]
fn test_find_by_id_ignores_unassigned() {
    let mut tree = sample_tree();

    assert_eq!(tree.find_by_id(""), None);
    tree.node_mut(3).id = "2".to_string();
    assert_eq!(tree.find_by_id("2"), Some(3));
}
