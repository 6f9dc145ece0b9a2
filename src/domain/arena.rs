//! Arena-backed element tree.
//!
//! Children are owned by the arena and referenced by index from their parent;
//! `parent` is a plain index back into the same arena, so the tree has no
//! ownership cycles and identity is `Index` equality.

use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Data payload for tree nodes: one markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element name, never empty
    pub tag: String,
    /// Class attribute values in source order, duplicates kept
    pub classes: Vec<String>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>, classes: Vec<String>) -> DomainResult<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(DomainError::EmptyTag);
        }
        Ok(Self { tag, classes })
    }
}

impl fmt::Display for ElementData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classes.is_empty() {
            write!(f, "{}", self.tag)
        } else {
            write!(f, "{} ({})", self.tag, self.classes.join(" "))
        }
    }
}

/// Tree node in the arena-based element structure.
#[derive(Debug)]
pub struct ElementNode {
    /// Element data for this node
    pub data: ElementData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    pub children: Vec<Index>,
}

/// Arena-based element tree.
///
/// Built once by the tree builder (or by importing an export) and read-only
/// afterwards. Exactly one node has no parent.
#[derive(Debug)]
pub struct ElementTree {
    /// Arena storage for all tree nodes
    arena: Arena<ElementNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node and wire it into its parent's `children`.
    ///
    /// A parentless insert becomes the root; there can only be one.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: ElementData, parent: Option<Index>) -> DomainResult<Index> {
        match parent {
            Some(parent_idx) if !self.arena.contains(parent_idx) => {
                return Err(DomainError::UnknownNode(parent_idx));
            }
            None if self.root.is_some() => return Err(DomainError::RootAlreadySet),
            _ => {}
        }

        let node_idx = self.arena.insert(ElementNode {
            data,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|idx| self.arena.get_mut(idx)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.root = Some(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&ElementNode> {
        self.arena.get(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|node| node.parent)
    }

    pub fn children_of(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Pre-order iteration over the whole tree.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order iteration over the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, Some(idx))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.calculate_depth(root))
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        self.get_node(node_idx).map_or(0, |node| {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        })
    }

    /// Number of nodes without children.
    pub fn leaf_count(&self) -> usize {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .count()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ElementTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ElementTree, start: Option<Index>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ElementNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}
