//! Domain layer: element tree model, builder and presentation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod document;
pub mod error;
pub mod presentation;

pub use arena::{ElementData, ElementNode, ElementTree, TreeIterator};
pub use builder::{TreeBuilder, DOCUMENT_TAG};
pub use document::{DocumentNode, MarkupNode};
pub use error::{DomainError, DomainResult};
pub use presentation::{
    breadcrumbs, extract_text_blocks, format_identifier, render_tree, TextScope, TreeView,
    DEFAULT_BLOCK_TAGS,
};

/// Expand environment variables and `~` in a path string.
///
/// Falls back to the input unchanged when expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
