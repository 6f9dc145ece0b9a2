//! Tree builder: converts a parsed document into arena-backed element trees.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{ElementData, ElementTree};
use crate::domain::document::DocumentNode;
use crate::domain::error::DomainResult;

/// Constructs element trees from any [`DocumentNode`] structure.
///
/// Traversal is depth-first pre-order. Nodes without an element name are not
/// part of the tree, but their children are still visited, so elements nested
/// inside non-element wrappers attach to the nearest element ancestor.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    skipped: usize,
}

/// One pending visit: the source node and the tree node its elements attach to.
type Visit<'d, D> = (&'d D, Option<Index>);

/// Tag of the synthetic root that holds several top-level elements.
pub const DOCUMENT_TAG: &str = "[document]";

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one tree holding every top-level element of `document`.
    ///
    /// A single top-level element becomes the root. Several are attached in
    /// document order under a synthetic [`DOCUMENT_TAG`] root.
    /// Returns `None` when the document contains no element at all.
    #[instrument(level = "debug", skip_all)]
    pub fn build<D: DocumentNode>(&mut self, document: &D) -> Option<ElementTree> {
        self.skipped = 0;
        let mut roots = Vec::new();
        collect_top_level(document, &mut roots, &mut self.skipped);

        let built = match roots.as_slice() {
            [] => return None,
            [single] => self.build_tree(*single),
            several => self.build_wrapped(several),
        };
        match built {
            Ok(tree) => {
                debug!(
                    "built tree from {} top-level element(s), {} element(s), skipped {} non-element node(s)",
                    roots.len(),
                    tree.len(),
                    self.skipped
                );
                Some(tree)
            }
            Err(e) => {
                debug!("discarding tree: {}", e);
                None
            }
        }
    }

    /// Build one tree per top-level element reachable through non-element wrappers.
    #[instrument(level = "debug", skip_all)]
    pub fn build_all<D: DocumentNode>(&mut self, document: &D) -> Vec<ElementTree> {
        self.skipped = 0;
        let mut trees = Vec::new();
        let mut roots = Vec::new();
        collect_top_level(document, &mut roots, &mut self.skipped);

        for root in roots {
            match self.build_tree(root) {
                Ok(tree) => trees.push(tree),
                Err(e) => debug!("discarding tree: {}", e),
            }
        }

        debug!(
            "built {} tree(s), {} element(s), skipped {} non-element node(s)",
            trees.len(),
            trees.iter().map(ElementTree::len).sum::<usize>(),
            self.skipped
        );
        trees
    }

    /// Number of non-element nodes passed over by the last build.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn build_tree<D: DocumentNode>(&mut self, root: &D) -> DomainResult<ElementTree> {
        let mut tree = ElementTree::new();
        self.build_into(&mut tree, root, None)?;
        Ok(tree)
    }

    fn build_wrapped<D: DocumentNode>(&mut self, roots: &[&D]) -> DomainResult<ElementTree> {
        let mut tree = ElementTree::new();
        let document = tree.insert_node(ElementData::new(DOCUMENT_TAG, Vec::new())?, None)?;
        for root in roots {
            self.build_into(&mut tree, *root, Some(document))?;
        }
        Ok(tree)
    }

    fn build_into<D: DocumentNode>(
        &mut self,
        tree: &mut ElementTree,
        root: &D,
        parent: Option<Index>,
    ) -> DomainResult<()> {
        let mut stack: Vec<Visit<'_, D>> = vec![(root, parent)];

        while let Some((node, parent_idx)) = stack.pop() {
            let attach_to = match qualifying_name(node) {
                Some(name) => {
                    let classes = node.class_list().into_iter().map(str::to_string).collect();
                    Some(tree.insert_node(ElementData::new(name, classes)?, parent_idx)?)
                }
                None => {
                    self.skipped += 1;
                    parent_idx
                }
            };

            // Reverse push keeps document order when popping
            for child in node.children().iter().rev() {
                stack.push((child, attach_to));
            }
        }

        Ok(())
    }
}

fn qualifying_name<D: DocumentNode>(node: &D) -> Option<&str> {
    node.element_name().filter(|name| !name.is_empty())
}

/// Collect the outermost elements, descending through non-element wrappers.
fn collect_top_level<'d, D: DocumentNode>(node: &'d D, roots: &mut Vec<&'d D>, skipped: &mut usize) {
    if qualifying_name(node).is_some() {
        roots.push(node);
        return;
    }
    *skipped += 1;
    for child in node.children() {
        collect_top_level(child, roots, skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::MarkupNode;

    fn el(name: &str, class: Option<&str>, children: Vec<MarkupNode>) -> MarkupNode {
        MarkupNode::element(name, class, children)
    }

    #[test]
    fn given_wrapper_between_elements_when_building_then_splices_into_ancestor() {
        // div > [text, (wrapper > p), span]
        let doc = el(
            "div",
            None,
            vec![
                MarkupNode::text_node("a"),
                MarkupNode::document(vec![el("p", None, vec![])]),
                el("span", None, vec![]),
            ],
        );
        let tree = TreeBuilder::new().build(&doc).unwrap();
        let root = tree.root().unwrap();
        let tags: Vec<&str> = tree
            .children_of(root)
            .iter()
            .map(|&i| tree.get_node(i).unwrap().data.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["p", "span"]);
    }

    #[test]
    fn given_document_without_elements_when_building_then_none() {
        let doc = MarkupNode::document(vec![
            MarkupNode::text_node("only text"),
            MarkupNode::Comment("c".into()),
        ]);
        let mut builder = TreeBuilder::new();
        assert!(builder.build(&doc).is_none());
        assert_eq!(builder.skipped(), 3);
    }

    #[test]
    fn given_several_top_level_elements_when_building_all_then_one_tree_each() {
        let doc = MarkupNode::document(vec![
            el("header", None, vec![]),
            MarkupNode::text_node("\n"),
            el("main", None, vec![el("p", None, vec![])]),
        ]);
        let trees = TreeBuilder::new().build_all(&doc);
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[1].len(), 2);
    }

    #[test]
    fn given_several_top_level_elements_when_building_then_wrapped_under_document_root() {
        let doc = MarkupNode::document(vec![
            el("header", None, vec![]),
            MarkupNode::text_node("\n"),
            el("main", None, vec![el("p", None, vec![])]),
        ]);
        let tree = TreeBuilder::new().build(&doc).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.get_node(root).unwrap().data.tag, DOCUMENT_TAG);
        let tags: Vec<&str> = tree
            .children_of(root)
            .iter()
            .map(|&i| tree.get_node(i).unwrap().data.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["header", "main"]);
        assert_eq!(tree.len(), 4);
    }
}
