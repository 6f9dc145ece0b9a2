//! Tests for the interactive explorer: cursor moves, search and the command loop

use std::io::Cursor;

use rstest::rstest;

use domscope::application::{Command, Explorer, NavigationError};
use domscope::domain::{format_identifier, DomainError, ElementTree, TreeBuilder};
use domscope::infrastructure::html::parse_markup;
use domscope::util::testing::{init_test_setup, NAV_MARKUP, SAMPLE_MARKUP};

fn nav_tree() -> ElementTree {
    init_test_setup();
    colored::control::set_override(false);
    TreeBuilder::new().build(&parse_markup(NAV_MARKUP)).unwrap()
}

fn identifier(explorer: &Explorer<'_>) -> String {
    format_identifier(explorer.current_node().unwrap())
}

fn session(tree: &ElementTree, input: &str) -> String {
    let mut explorer = Explorer::new(tree).unwrap();
    let mut out = Vec::new();
    explorer.run(Cursor::new(input), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn given_root_when_ascending_then_fails_and_stays() {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();

    let result = explorer.descend("..");

    assert_eq!(result, Err(NavigationError::AtRoot));
    assert_eq!(explorer.current(), tree.root().unwrap());
}

#[test]
fn given_child_when_descending_and_ascending_then_back_at_same_node() {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();

    explorer.descend("0").unwrap();
    assert_eq!(identifier(&explorer), "nav (nav-bar main)");
    explorer.descend("..").unwrap();

    assert_eq!(explorer.current(), tree.root().unwrap());
}

#[rstest]
#[case::past_end("2", 2)]
#[case::negative("-1", -1)]
fn given_bad_index_when_descending_then_out_of_range(#[case] target: &str, #[case] index: i64) {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();

    let result = explorer.descend(target);

    assert_eq!(
        result,
        Err(NavigationError::IndexOutOfRange { index, len: 2 })
    );
    assert_eq!(explorer.current(), tree.root().unwrap());
}

#[rstest]
#[case::first_of_two("post", "article (post)")]
#[case::second_only("featured", "article (post featured)")]
#[case::across_class_boundary("post feat", "article (post featured)")]
fn given_class_text_when_descending_then_first_matching_child(
    #[case] target: &str,
    #[case] expected: &str,
) {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();
    explorer.descend("content").unwrap();

    explorer.descend(target).unwrap();

    assert_eq!(identifier(&explorer), expected);
}

#[test]
fn given_unmatched_class_when_descending_then_stays() {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();

    let result = explorer.descend("sidebar");

    assert_eq!(result, Err(NavigationError::NoClassMatch("sidebar".into())));
    assert_eq!(explorer.current(), tree.root().unwrap());
}

#[test]
fn given_empty_query_when_searching_then_every_node_in_preorder() {
    let tree = nav_tree();
    let explorer = Explorer::new(&tree).unwrap();

    let results = explorer.search("");

    let expected: Vec<_> = tree.iter().map(|(idx, _)| idx).collect();
    assert_eq!(results, expected);
    assert_eq!(results.len(), 10);
}

#[test]
fn given_mixed_case_query_when_searching_then_case_insensitive_below_cursor() {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();
    explorer.descend("nav-bar").unwrap();

    let results = explorer.search("ITEM");
    let articles = explorer.search("article");

    let found: Vec<_> = results
        .iter()
        .map(|&idx| format_identifier(tree.get_node(idx).unwrap()))
        .collect();
    assert_eq!(found, vec!["li (item)", "li (item active)"]);
    assert!(articles.is_empty());
}

#[test]
fn given_subtree_when_expanding_then_cursor_is_first_line() {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();
    explorer.descend("1").unwrap();

    let rendered = explorer.expand();

    assert_eq!(rendered.lines().next(), Some("main (content)"));
    assert_eq!(rendered.lines().count(), 5);
}

#[test]
fn given_commands_when_executing_then_reports_outcome() {
    let tree = nav_tree();
    let mut explorer = Explorer::new(&tree).unwrap();
    let mut out = Vec::new();

    explorer
        .execute(&Command::ChangeDir("..".into()), &mut out)
        .unwrap();
    explorer
        .execute(&Command::Search("zzz".into()), &mut out)
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Cannot move: already at the root"));
    assert!(text.contains("No matches found."));
}

#[test]
fn given_session_when_running_then_prints_path_children_and_subtree() {
    let tree = nav_tree();

    let out = session(&tree, "cd 0\ncd menu\nexpand\nsearch active\nexit\n");

    assert!(out.contains("Path: div (page)\n"));
    assert!(out.contains("  [0] nav (nav-bar main)\n  [1] main (content)\n"));
    assert!(out.contains("Path: div (page) > nav (nav-bar main) > ul (menu)\n"));
    assert!(out.contains("Subtree from current node:\nul (menu)\n"));
    assert!(out.contains("Search results:\n  [0] li (item active)\n"));
    assert!(out.trim_end().ends_with("Exiting explorer."));
}

#[test]
fn given_leaf_when_running_then_reports_no_children() {
    let tree = nav_tree();

    let out = session(&tree, "cd 1\ncd 0\ncd 0\n");

    assert!(out.contains("Path: div (page) > main (content) > article (post) > p\nNo children.\n"));
}

#[test]
fn given_unknown_command_when_running_then_session_continues_until_end_of_input() {
    let tree = nav_tree();

    let out = session(&tree, "jump 3\ncd\n");

    assert!(out.contains("unknown command: jump 3"));
    assert!(out.contains("unknown command: cd"));
    assert_eq!(out.matches("Path: div (page)\n").count(), 3);
    assert!(!out.contains("Exiting explorer."));
}

#[test]
fn given_inner_node_when_starting_there_then_ascends_to_root() {
    let tree = nav_tree();
    let nav = tree.children_of(tree.root().unwrap())[0];

    let mut explorer = Explorer::at(&tree, nav).unwrap();

    assert_eq!(explorer.breadcrumbs(), "div (page) > nav (nav-bar main)");
    assert_eq!(explorer.ascend(), Ok(tree.root().unwrap()));
}

#[test]
fn given_index_of_other_tree_when_starting_there_then_unknown_node() {
    let tree = nav_tree();
    let small = TreeBuilder::new().build(&parse_markup(SAMPLE_MARKUP)).unwrap();
    let last = tree.iter().last().map(|(idx, _)| idx).unwrap();

    let result = Explorer::at(&small, last);

    assert!(matches!(result, Err(DomainError::UnknownNode(idx)) if idx == last));
}
