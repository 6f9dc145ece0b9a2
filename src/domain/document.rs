//! Generic parsed-document capability.
//!
//! The tree builder and text extraction only need element names, class lists,
//! ordered children and text. Any parser output can be adapted by implementing
//! [`DocumentNode`]; [`MarkupNode`] is the owned structure the HTML adapter produces.

/// Capability set of a parsed markup node.
pub trait DocumentNode: Sized {
    /// Element name, `None` for non-element content (text, comments, document wrappers).
    fn element_name(&self) -> Option<&str>;

    /// Values of the class attribute in source order.
    fn class_list(&self) -> Vec<&str>;

    /// Child entries in document order.
    fn children(&self) -> &[Self];

    /// Character data carried by this node, if it is a text node.
    fn text(&self) -> Option<&str> {
        None
    }
}

/// Owned parsed-document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// Document or fragment wrapper
    Document { children: Vec<MarkupNode> },
    /// Element with its raw class attribute
    Element {
        name: String,
        class: Option<String>,
        children: Vec<MarkupNode>,
    },
    Text(String),
    Comment(String),
}

impl MarkupNode {
    pub fn document(children: Vec<MarkupNode>) -> Self {
        Self::Document { children }
    }

    pub fn element(name: impl Into<String>, class: Option<&str>, children: Vec<MarkupNode>) -> Self {
        Self::Element {
            name: name.into(),
            class: class.map(str::to_string),
            children,
        }
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl DocumentNode for MarkupNode {
    fn element_name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    fn class_list(&self) -> Vec<&str> {
        match self {
            Self::Element {
                class: Some(class), ..
            } => class.split_ascii_whitespace().collect(),
            _ => Vec::new(),
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            Self::Document { children } | Self::Element { children, .. } => children,
            Self::Text(_) | Self::Comment(_) => &[],
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
