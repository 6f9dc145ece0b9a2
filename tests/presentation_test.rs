//! Tests for identifiers, tree rendering, breadcrumbs and text-block extraction

use std::collections::BTreeMap;

use rstest::rstest;

use domscope::domain::{
    breadcrumbs, extract_text_blocks, format_identifier, render_tree, ElementTree, TextScope,
    TreeBuilder, DEFAULT_BLOCK_TAGS,
};
use domscope::infrastructure::html::parse_markup;
use domscope::util::testing::{init_test_setup, NAV_MARKUP, SAMPLE_MARKUP};

fn build(markup: &str) -> ElementTree {
    init_test_setup();
    TreeBuilder::new().build(&parse_markup(markup)).unwrap()
}

fn blocks(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(tag, texts)| {
            (
                tag.to_string(),
                texts.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn given_nodes_when_formatting_identifier_then_classes_in_parentheses() {
    let tree = build(SAMPLE_MARKUP);
    let root = tree.root().unwrap();
    let children = tree.children_of(root);

    assert_eq!(format_identifier(tree.get_node(root).unwrap()), "div (a)");
    assert_eq!(format_identifier(tree.get_node(children[0]).unwrap()), "p");
    assert_eq!(format_identifier(tree.get_node(children[1]).unwrap()), "span (b)");
}

#[rstest]
#[case::sample(SAMPLE_MARKUP)]
#[case::navigation(NAV_MARKUP)]
fn given_tree_when_rendering_then_one_line_per_node(#[case] markup: &str) {
    let tree = build(markup);

    let rendered = render_tree(&tree, tree.root().unwrap());

    assert_eq!(rendered.lines().count(), tree.len());
}

#[test]
fn given_navigation_tree_when_rendering_then_connectors_show_nesting() {
    let tree = build(NAV_MARKUP);

    let rendered = render_tree(&tree, tree.root().unwrap());

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "div (page)");
    assert!(lines[1].starts_with("├── nav (nav-bar main)"));
    assert!(lines[2].contains("└── ul (menu)"));
    assert!(lines[5].starts_with("└── main (content)"));
    assert!(lines[9].trim_end().ends_with("└── p"));
}

#[test]
fn given_inner_node_when_rendering_then_it_is_first_line() {
    let tree = build(NAV_MARKUP);
    let main = tree.children_of(tree.root().unwrap())[1];

    let rendered = render_tree(&tree, main);

    assert_eq!(rendered.lines().next(), Some("main (content)"));
    assert_eq!(rendered.lines().count(), 5);
}

#[test]
fn given_root_when_breadcrumbs_then_no_separator() {
    let tree = build(NAV_MARKUP);

    let path = breadcrumbs(&tree, tree.root().unwrap());

    assert_eq!(path, "div (page)");
    assert!(!path.contains(" > "));
}

#[test]
fn given_deep_node_when_breadcrumbs_then_root_to_node() {
    let tree = build(NAV_MARKUP);
    let active = tree
        .iter()
        .find(|(_, n)| n.data.classes.contains(&"active".to_string()))
        .map(|(idx, _)| idx)
        .unwrap();

    let path = breadcrumbs(&tree, active);

    assert_eq!(
        path,
        "div (page) > nav (nav-bar main) > ul (menu) > li (item active)"
    );
}

#[test]
fn given_nested_blocks_when_extracting_exclusive_then_inner_text_stays_inner() {
    init_test_setup();
    let document = parse_markup(SAMPLE_MARKUP);

    let result = extract_text_blocks(&document, &DEFAULT_BLOCK_TAGS, TextScope::Exclusive);

    assert_eq!(result, blocks(&[("p", &["X"]), ("span", &["Y"])]));
}

#[test]
fn given_nested_blocks_when_extracting_nested_then_outer_repeats_text() {
    init_test_setup();
    let document = parse_markup(SAMPLE_MARKUP);

    let result = extract_text_blocks(&document, &DEFAULT_BLOCK_TAGS, TextScope::Nested);

    assert_eq!(
        result,
        blocks(&[("div", &["XY"]), ("p", &["X"]), ("span", &["Y"])])
    );
}

#[test]
fn given_script_and_whitespace_when_extracting_then_ignored() {
    init_test_setup();
    let document = parse_markup("<div>A<script>var x = 1;</script><!-- c --></div><p>   </p>");

    let result = extract_text_blocks(&document, &DEFAULT_BLOCK_TAGS, TextScope::Exclusive);

    assert_eq!(result, blocks(&[("div", &["A"])]));
}

#[test]
fn given_custom_tags_when_extracting_then_document_order_per_tag() {
    init_test_setup();
    let document = parse_markup(NAV_MARKUP);

    let result = extract_text_blocks(&document, &["li", "P"], TextScope::Exclusive);

    assert_eq!(
        result,
        blocks(&[("li", &["Home", "About"]), ("p", &["First", "Second"])])
    );
}
