//! Human-readable views of element trees.
//!
//! Everything here is pure: functions return strings or plain data and leave
//! printing to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::arena::{ElementNode, ElementTree};
use crate::domain::document::DocumentNode;
use crate::domain::error::DomainError;

/// Tags whose text is collected when no other set is configured.
pub const DEFAULT_BLOCK_TAGS: [&str; 3] = ["div", "p", "span"];

/// Separator between breadcrumb entries.
pub const BREADCRUMB_SEPARATOR: &str = " > ";

/// Elements whose character data is not document text.
const NON_TEXT_TAGS: [&str; 3] = ["script", "style", "template"];

/// `tag (class1 class2)`, or just `tag` without classes.
pub fn format_identifier(node: &ElementNode) -> String {
    node.data.to_string()
}

/// Conversion into a `termtree` view of a subtree.
pub trait TreeView {
    fn subtree_view(&self, idx: Index) -> Option<Tree<String>>;
}

impl TreeView for ElementTree {
    fn subtree_view(&self, idx: Index) -> Option<Tree<String>> {
        let node = self.get_node(idx)?;
        let leaves: Vec<Tree<String>> = node
            .children
            .iter()
            .filter_map(|&child| self.subtree_view(child))
            .collect();
        Some(Tree::new(format_identifier(node)).with_leaves(leaves))
    }
}

/// Multi-line tree rendering of the subtree at `idx`, one line per node in pre-order.
pub fn render_tree(tree: &ElementTree, idx: Index) -> String {
    tree.subtree_view(idx)
        .map(|view| view.to_string())
        .unwrap_or_default()
}

/// Path from the root down to `idx`, e.g. `html > body > div (main)`.
pub fn breadcrumbs(tree: &ElementTree, idx: Index) -> String {
    let mut path = Vec::new();
    let mut current = Some(idx);
    while let Some(node) = current.and_then(|i| tree.get_node(i)) {
        path.push(format_identifier(node));
        current = node.parent;
    }
    path.reverse();
    path.join(BREADCRUMB_SEPARATOR)
}

/// Which text an outer block claims when it contains inner blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextScope {
    /// Text inside a nested block belongs to that block only.
    #[default]
    Exclusive,
    /// Every block reports all of its descendant text, so nested text repeats.
    Nested,
}

impl fmt::Display for TextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextScope::Exclusive => write!(f, "exclusive"),
            TextScope::Nested => write!(f, "nested"),
        }
    }
}

impl FromStr for TextScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive" => Ok(TextScope::Exclusive),
            "nested" => Ok(TextScope::Nested),
            _ => Err(DomainError::InvalidTextScope(s.to_string())),
        }
    }
}

/// Group stripped text by block tag, in document order per tag.
///
/// Works on the parsed document rather than the element tree because tree
/// nodes carry no text. Blocks whose text strips to nothing are left out.
pub fn extract_text_blocks<D, S>(
    document: &D,
    block_tags: &[S],
    scope: TextScope,
) -> BTreeMap<String, Vec<String>>
where
    D: DocumentNode,
    S: AsRef<str>,
{
    let mut blocks: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut pending = vec![document];

    while let Some(node) = pending.pop() {
        if let Some(tag) = node.element_name().filter(|t| is_block(t, block_tags)) {
            let mut text = String::new();
            collect_text(node, block_tags, scope, &mut text);
            if !text.is_empty() {
                blocks.entry(tag.to_ascii_lowercase()).or_default().push(text);
            }
        }
        pending.extend(node.children().iter().rev());
    }

    blocks
}

fn collect_text<D: DocumentNode, S: AsRef<str>>(
    node: &D,
    block_tags: &[S],
    scope: TextScope,
    out: &mut String,
) {
    if let Some(text) = node.text() {
        out.push_str(text.trim());
    }
    for child in node.children() {
        if let Some(tag) = child.element_name() {
            if NON_TEXT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                continue;
            }
            if scope == TextScope::Exclusive && is_block(tag, block_tags) {
                continue;
            }
        }
        collect_text(child, block_tags, scope, out);
    }
}

fn is_block<S: AsRef<str>>(tag: &str, block_tags: &[S]) -> bool {
    block_tags
        .iter()
        .any(|block| block.as_ref().eq_ignore_ascii_case(tag))
}
