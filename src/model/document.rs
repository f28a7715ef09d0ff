//! A whole report document: declaration plus top-level nodes.

use super::node::{Element, Node};

/// The `<?xml ...?>` declaration, kept as document metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// `version` pseudo-attribute.
    pub version: String,
    /// `encoding` pseudo-attribute, if present.
    pub encoding: Option<String>,
    /// `standalone` pseudo-attribute, if present.
    pub standalone: Option<String>,
}

impl Default for Declaration {
    /// `version="1.0" encoding="UTF-8"`.
    fn default() -> Self {
        Self {
            version: "1.0".to_owned(),
            encoding: Some("UTF-8".to_owned()),
            standalone: None,
        }
    }
}

/// An ordered sequence of top-level nodes plus declaration metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// The declaration, if the source had one.
    pub declaration: Option<Declaration>,
    /// Top-level nodes; normally a single collection element.
    pub nodes: Vec<Node>,
}

impl Document {
    /// A document with the default declaration and a single root element.
    #[must_use]
    pub fn with_root(root: Element) -> Self {
        Self {
            declaration: Some(Declaration::default()),
            nodes: vec![Node::Element(root)],
        }
    }

    /// The first top-level element.
    #[must_use]
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// `true` when the document has no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
