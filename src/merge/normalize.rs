//! NORMALIZE step: present every source document as one `<testsuites>`.

use crate::model::{COLLECTION_TAG, Document, Element, Node};

/// Turn `document` into a collection element.
///
/// - A `<testsuites>` root contributes its attributes and children.
/// - A bare `<testsuite>` root becomes the single child of a synthetic
///   collection.
/// - Any other top-level node (comments, foreign root elements) is kept as a
///   child, so the fold passes it through.
#[must_use]
pub fn normalize(document: Document) -> Element {
    let mut collection = Element::new(COLLECTION_TAG);
    for node in document.nodes {
        match node {
            Node::Element(root) if root.is_collection() => {
                let (attributes, children) = root.into_parts();
                for attr in attributes {
                    collection.set_attribute(attr.name, attr.value);
                }
                collection.children_mut().extend(children);
            }
            Node::Element(_) | Node::Text(_) | Node::Comment(_) | Node::CData(_) => {
                collection.push_child(node);
            }
        }
    }
    collection
}
