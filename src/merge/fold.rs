//! FOLD step: merge one source node list into an accumulator element.
//!
//! Sections (`<testsuite>`) are matched by their `name` attribute against the
//! accumulator's direct children; the first match absorbs the source section's
//! attributes and, recursively, its children. Everything else (test cases,
//! comments, text, unrelated elements, unnamed or unmatched sections) is
//! appended after the existing children.
//!
//! # Example
//!
//! ```text
//! accumulator: <testsuites> [A(tests=2), B(tests=1)]
//! source:      [B(tests=4), <!-- c -->, C(tests=1)]
//!
//! result:      <testsuites> [A(tests=2), B(tests=5), <!-- c -->, C(tests=1)]
//! ```

use crate::model::{Attribute, Element, Node};
use crate::policy;

/// Fold `source` into `target` in place.
///
/// Pre-existing children of `target` keep their relative order; nodes that are
/// not merged into an existing section are appended at the end.
pub fn fold(target: &mut Element, source: &[Node]) {
    for node in source {
        match node {
            Node::Element(element) if element.is_section() => fold_section(target, element),
            Node::Element(_) | Node::Text(_) | Node::Comment(_) | Node::CData(_) => {
                target.push_child(node.clone());
            }
        }
    }
}

fn fold_section(target: &mut Element, section: &Element) {
    match section
        .identity()
        .and_then(|identity| find_section_mut(target, identity))
    {
        Some(canonical) => {
            merge_attributes(canonical, section.attributes());
            fold(canonical, section.children());
        }
        None => {
            tracing::trace!(
                parent = target.name(),
                section = section.identity().unwrap_or_default(),
                "appending section"
            );
            target.push_child(section.clone());
        }
    }
}

/// First direct child section of `parent` whose identity equals `identity`.
fn find_section_mut<'a>(parent: &'a mut Element, identity: &str) -> Option<&'a mut Element> {
    parent
        .children_mut()
        .iter_mut()
        .find_map(|node| match node {
            Node::Element(element)
                if element.is_section() && element.identity() == Some(identity) =>
            {
                Some(element)
            }
            Node::Element(_) | Node::Text(_) | Node::Comment(_) | Node::CData(_) => None,
        })
}

/// Merge `incoming` attributes into `target`.
///
/// - Missing on `target`: appended verbatim.
/// - Present and listed in the policy with numeric values on both sides:
///   replaced by the aggregate.
/// - Otherwise `target`'s value is kept and the incoming value is dropped.
pub fn merge_attributes<'a>(target: &mut Element, incoming: impl IntoIterator<Item = &'a Attribute>) {
    for Attribute { name, value } in incoming {
        match target.attribute(name) {
            None => target.set_attribute(name.clone(), value.clone()),
            Some(current) => match policy::aggregate(name, current, value) {
                Some(merged) => target.set_attribute(name.clone(), merged),
                None => tracing::trace!(
                    attribute = %name,
                    kept = current,
                    dropped = %value,
                    "attribute not aggregated"
                ),
            },
        }
    }
}
