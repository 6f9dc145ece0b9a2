//! Acyclic export of element trees.
//!
//! The exported shape follows only the owning `children` direction, so it has
//! no parent field and no cycles. Output is JSON with 2-space indentation.

use std::path::Path;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{DomainError, ElementData, ElementTree};
use crate::infrastructure::traits::FileSystem;

/// One exported element. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedNode {
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub children: Vec<ExportedNode>,
}

impl ExportedNode {
    /// Copy the subtree at `idx` out of the arena.
    pub fn from_tree(tree: &ElementTree, idx: Index) -> ApplicationResult<Self> {
        let node = tree.get_node(idx).ok_or(DomainError::UnknownNode(idx))?;
        let children = node
            .children
            .iter()
            .map(|&child| Self::from_tree(tree, child))
            .collect::<ApplicationResult<Vec<_>>>()?;
        Ok(Self {
            tag: node.data.tag.clone(),
            classes: node.data.classes.clone(),
            children,
        })
    }

    /// Number of elements in this exported subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ExportedNode::count).sum::<usize>()
    }
}

/// Serialize the subtree rooted at `idx`.
pub fn export(tree: &ElementTree, idx: Index) -> ApplicationResult<String> {
    let exported = ExportedNode::from_tree(tree, idx)?;
    Ok(serde_json::to_string_pretty(&exported)?)
}

/// Serialize the subtree rooted at `idx` and write it to `path`.
#[instrument(level = "debug", skip(fs, tree))]
pub fn write_export(
    fs: &dyn FileSystem,
    tree: &ElementTree,
    idx: Index,
    path: &Path,
) -> ApplicationResult<()> {
    let json = export(tree, idx)?;
    fs.ensure_parent(path)
        .with_path_context("create export directory", path)?;
    fs.write(path, &json).with_path_context("write export", path)?;
    debug!("exported {} bytes to {}", json.len(), path.display());
    Ok(())
}

/// Rebuild an element tree from exported JSON.
#[instrument(level = "debug", skip_all)]
pub fn import(json: &str) -> ApplicationResult<ElementTree> {
    let exported: ExportedNode = serde_json::from_str(json)?;
    let mut tree = ElementTree::new();
    let mut stack: Vec<(&ExportedNode, Option<Index>)> = vec![(&exported, None)];

    while let Some((node, parent)) = stack.pop() {
        let data = ElementData::new(node.tag.clone(), node.classes.clone())?;
        let idx = tree.insert_node(data, parent)?;
        for child in node.children.iter().rev() {
            stack.push((child, Some(idx)));
        }
    }

    debug!("imported {} element(s)", tree.len());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ElementTree {
        let mut tree = ElementTree::new();
        let div = tree
            .insert_node(ElementData::new("div", vec!["a".into()]).unwrap(), None)
            .unwrap();
        tree.insert_node(ElementData::new("p", vec![]).unwrap(), Some(div))
            .unwrap();
        tree.insert_node(ElementData::new("span", vec!["b".into()]).unwrap(), Some(div))
            .unwrap();
        tree
    }

    #[test]
    fn given_tree_when_exporting_then_two_space_indented_without_parent() {
        let tree = sample_tree();
        let json = export(&tree, tree.root().unwrap()).unwrap();
        let expected = r#"{
  "tag": "div",
  "classes": [
    "a"
  ],
  "children": [
    {
      "tag": "p",
      "classes": [],
      "children": []
    },
    {
      "tag": "span",
      "classes": [
        "b"
      ],
      "children": []
    }
  ]
}"#;
        assert_eq!(json, expected);
        assert!(!json.contains("parent"));
    }

    #[test]
    fn given_export_when_importing_then_structure_preserved() {
        let tree = sample_tree();
        let json = export(&tree, tree.root().unwrap()).unwrap();
        let imported = import(&json).unwrap();
        assert_eq!(imported.len(), 3);
        assert_eq!(export(&imported, imported.root().unwrap()).unwrap(), json);
    }

    #[test]
    fn given_empty_tag_when_importing_then_errors() {
        let result = import(r#"{"tag": "", "classes": [], "children": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn given_minimal_json_when_importing_then_defaults_apply() {
        let tree = import(r#"{"tag": "div", "children": [{"tag": "p"}]}"#).unwrap();
        assert_eq!(tree.len(), 2);
    }
}
