//! In-memory report tree: the ordered document model shared by the parser,
//! the merge engine, and the serializer.

pub mod document;
pub mod node;

pub use document::{Declaration, Document};
pub use node::{Attribute, COLLECTION_TAG, Element, IDENTITY_ATTRIBUTE, Node, SECTION_TAG};
