//! Plain-text report of extracted text blocks and the class tree.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::instrument;

use crate::application::{ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

const BLOCK_RULE_WIDTH: usize = 50;

/// Render text blocks followed by the rendered tree.
pub fn render_report(blocks: &BTreeMap<String, Vec<String>>, tree: &str) -> String {
    let rule = "-".repeat(BLOCK_RULE_WIDTH);
    let mut lines = vec!["Extracted Text Blocks:".to_string()];
    for (tag, texts) in blocks {
        lines.push(format!("{}:", tag));
        lines.extend(texts.iter().map(|text| format!("  - {}", text)));
        lines.push(rule.clone());
    }
    lines.push(String::new());
    lines.push("Class Tree:".to_string());

    let mut report = lines.join("\n");
    report.push('\n');
    report.push_str(tree);
    report
}

#[instrument(level = "debug", skip(fs, blocks, tree))]
pub fn write_report(
    fs: &dyn FileSystem,
    path: &Path,
    blocks: &BTreeMap<String, Vec<String>>,
    tree: &str,
) -> ApplicationResult<()> {
    fs.ensure_parent(path)
        .with_path_context("create report directory", path)?;
    fs.write(path, &render_report(blocks, tree))
        .with_path_context("write report", path)
}
