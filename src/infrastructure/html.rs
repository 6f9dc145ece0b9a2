//! HTML parsing adapter over `scraper` (html5ever).
//!
//! Converts scraper's DOM into the owned [`MarkupNode`] structure the domain
//! layer works with. Doctypes and processing instructions are dropped; text
//! and comments are kept so block text can be extracted later.

use scraper::{ElementRef, Html, Node};
use tracing::{debug, instrument};

use crate::domain::MarkupNode;
use crate::infrastructure::traits::MarkupParser;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Real markup parser backed by `scraper`.
#[derive(Debug, Default)]
pub struct ScraperParser;

impl MarkupParser for ScraperParser {
    fn parse(&self, markup: &str) -> MarkupNode {
        parse_markup(markup)
    }
}

/// Parse HTML text into a document node.
///
/// Full documents (leading `<!doctype` or `<html`) keep their `html` root.
/// A byte order mark, whitespace and comments before it are skipped.
/// Anything else is parsed as a fragment without the synthetic `html` wrapper.
#[instrument(level = "debug", skip_all, fields(len = markup.len()))]
pub fn parse_markup(markup: &str) -> MarkupNode {
    let markup = markup.strip_prefix(BYTE_ORDER_MARK).unwrap_or(markup);
    if is_full_document(markup) {
        let html = Html::parse_document(markup);
        debug!("parsed full document, {} parse error(s)", html.errors.len());
        MarkupNode::document(vec![convert_element(html.root_element())])
    } else {
        let html = Html::parse_fragment(markup);
        debug!("parsed fragment, {} parse error(s)", html.errors.len());
        MarkupNode::document(convert_children(html.root_element()))
    }
}

fn is_full_document(markup: &str) -> bool {
    let mut rest = markup.trim_start_matches(BYTE_ORDER_MARK).trim_start();
    while let Some(comment) = rest.strip_prefix("<!--") {
        match comment.find("-->") {
            Some(end) => rest = comment[end + 3..].trim_start(),
            None => return false,
        }
    }
    let head = rest
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn convert_element(element: ElementRef<'_>) -> MarkupNode {
    let value = element.value();
    MarkupNode::element(value.name(), value.attr("class"), convert_children(element))
}

fn convert_children(element: ElementRef<'_>) -> Vec<MarkupNode> {
    let mut children = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    children.push(convert_element(child_element));
                }
            }
            Node::Text(text) => {
                let content: &str = text;
                children.push(MarkupNode::text_node(content));
            }
            Node::Comment(comment) => {
                let content: &str = comment;
                children.push(MarkupNode::Comment(content.to_string()));
            }
            _ => {}
        }
    }
    children
}
