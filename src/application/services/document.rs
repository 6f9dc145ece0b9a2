//! Document service
//!
//! Loads markup or previously exported trees, builds element trees, and runs
//! export, text extraction and report generation against them.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::error_ext::missing_input;
use crate::application::{export, report, ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    extract_text_blocks, render_tree, ElementTree, MarkupNode, TextScope, TreeBuilder, DOCUMENT_TAG,
};
use crate::infrastructure::traits::{FileSystem, MarkupParser};

/// Kind of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Raw markup, parsed with the markup parser
    Markup,
    /// JSON previously written by the exporter
    Export,
}

impl InputFormat {
    /// Exported trees are JSON objects, so anything starting with `{` is tried
    /// as an export first.
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            InputFormat::Export
        } else {
            InputFormat::Markup
        }
    }
}

/// A built element tree plus the parsed document it came from.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Where the content came from (path or `-`)
    pub source: String,
    /// Parsed markup; `None` when the tree was imported from an export
    pub markup: Option<MarkupNode>,
    pub tree: ElementTree,
}

/// Service for loading documents and producing their derived outputs.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
    parser: Arc<dyn MarkupParser>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>, parser: Arc<dyn MarkupParser>) -> Self {
        Self { fs, parser }
    }

    /// Read and build a document from a file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LoadedDocument> {
        if !self.fs.is_file(path) {
            return Err(missing_input(path));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read input", path)?;
        self.load_str(&path.display().to_string(), &content)
    }

    /// Build a document from in-memory content.
    ///
    /// Content that looks like an export but is not valid export JSON is
    /// parsed as markup instead. Fails with `NoElements` when the markup
    /// contains no element.
    pub fn load_str(&self, source: &str, content: &str) -> ApplicationResult<LoadedDocument> {
        if InputFormat::sniff(content) == InputFormat::Export {
            match export::import(content) {
                Ok(tree) => {
                    debug!("load: imported {} element(s) from {}", tree.len(), source);
                    return Ok(LoadedDocument {
                        source: source.to_string(),
                        markup: None,
                        tree,
                    });
                }
                Err(ApplicationError::Serialization(e)) => {
                    debug!("load: {} is not an export ({}), parsing as markup", source, e);
                }
                Err(e) => return Err(e),
            }
        }
        self.load_markup(source, content)
    }

    fn load_markup(&self, source: &str, content: &str) -> ApplicationResult<LoadedDocument> {
        let markup = self.parser.parse(content);
        let tree = TreeBuilder::new()
            .build(&markup)
            .ok_or_else(|| ApplicationError::NoElements(source.to_string()))?;
        let root = root_tag(&tree);
        if root == Some(DOCUMENT_TAG) {
            debug!("load: several top-level elements in {}, kept under {}", source, DOCUMENT_TAG);
        }
        info!(
            "built tree from {}: root {}, {} element(s), {} leaves, depth {}",
            source,
            root.unwrap_or_default(),
            tree.len(),
            tree.leaf_count(),
            tree.depth()
        );
        Ok(LoadedDocument {
            source: source.to_string(),
            markup: Some(markup),
            tree,
        })
    }

    /// Write the whole tree as exported JSON.
    pub fn export(&self, document: &LoadedDocument, path: &Path) -> ApplicationResult<()> {
        let root = root_of(document)?;
        export::write_export(self.fs.as_ref(), &document.tree, root, path)
    }

    /// Group block text of the original markup by tag.
    pub fn text_blocks<S: AsRef<str>>(
        &self,
        document: &LoadedDocument,
        block_tags: &[S],
        scope: TextScope,
    ) -> ApplicationResult<BTreeMap<String, Vec<String>>> {
        let markup = document
            .markup
            .as_ref()
            .ok_or_else(|| ApplicationError::MarkupRequired(document.source.clone()))?;
        Ok(extract_text_blocks(markup, block_tags, scope))
    }

    /// Rendering of the whole tree.
    pub fn render(&self, document: &LoadedDocument) -> ApplicationResult<String> {
        Ok(render_tree(&document.tree, root_of(document)?))
    }

    /// Write the text-block and class-tree report.
    #[instrument(level = "debug", skip(self, document, block_tags))]
    pub fn write_report<S: AsRef<str>>(
        &self,
        document: &LoadedDocument,
        block_tags: &[S],
        scope: TextScope,
        path: &Path,
    ) -> ApplicationResult<()> {
        let blocks = self.text_blocks(document, block_tags, scope)?;
        let tree = self.render(document)?;
        report::write_report(self.fs.as_ref(), path, &blocks, &tree)
    }
}

fn root_of(document: &LoadedDocument) -> ApplicationResult<generational_arena::Index> {
    document
        .tree
        .root()
        .ok_or_else(|| ApplicationError::NoElements(document.source.clone()))
}

fn root_tag(tree: &ElementTree) -> Option<&str> {
    tree.root()
        .and_then(|idx| tree.get_node(idx))
        .map(|node| node.data.tag.as_str())
}
