//! Report merge engine.
//!
//! Implements the normalize → fold → rollup pipeline. Each phase is a
//! separate module.
//!
//! - **normalize**: present a source document as one `<testsuites>` element,
//!   wrapping a bare `<testsuite>` root.
//! - **fold**: merge the source's children into the accumulator root, matching
//!   sections by `name` and aggregating counters per [`crate::policy`].
//! - **rollup**: once every source is folded, recompute the root counters from
//!   its immediate sections.
//!
//! # Determinism
//!
//! The output depends only on the sources and their order. The first source
//! to introduce a section identity owns the surviving node; later sources only
//! add attributes, aggregate counters and append children to it. Sources must
//! therefore be folded one at a time, in input order, into a single
//! accumulator.

pub mod fold;
pub mod normalize;
pub mod rollup;


use tracing::instrument;

use crate::model::{COLLECTION_TAG, Document, Element};
use crate::policy;

pub use fold::{fold, merge_attributes};
pub use normalize::normalize;
pub use rollup::recompute_rollup;

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// Incremental merge of source documents into one report.
///
/// ```
/// use jmerge::{Merger, parse};
///
/// let mut merger = Merger::new();
/// merger.fold_document(parse(r#"<testsuite name="a" tests="2"/>"#).unwrap());
/// merger.fold_document(parse(r#"<testsuite name="a" tests="3"/>"#).unwrap());
/// let merged = merger.finish();
/// assert_eq!(merged.root().and_then(|r| r.attribute("tests")), Some("5"));
/// ```
#[derive(Debug)]
pub struct Merger {
    root: Element,
    folded: usize,
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

impl Merger {
    /// Start with an empty `<testsuites>` root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Element::new(COLLECTION_TAG),
            folded: 0,
        }
    }

    /// Fold one source document into the accumulator.
    ///
    /// Attributes of the source's `<testsuites>` root are adopted by the
    /// accumulator root when it does not have them yet; they are never
    /// aggregated. Rollup counters are skipped, since [`finish`] derives them
    /// from the sections.
    ///
    /// [`finish`]: Self::finish
    #[instrument(skip_all, fields(source = self.folded + 1))]
    pub fn fold_document(&mut self, source: Document) {
        let collection = normalize(source);
        for attr in collection.attributes() {
            if policy::is_rollup_attribute(&attr.name)
                || self.root.attribute(&attr.name).is_some()
            {
                continue;
            }
            self.root.set_attribute(attr.name.clone(), attr.value.clone());
        }
        fold(&mut self.root, collection.children());
        self.folded += 1;
        tracing::debug!(
            sections = self.root.sections().count(),
            "folded source document"
        );
    }

    /// Number of documents folded so far.
    #[must_use]
    pub const fn sources_folded(&self) -> usize {
        self.folded
    }

    /// Run the rollup and return the merged document.
    #[must_use]
    #[instrument(skip_all, fields(sources = self.folded))]
    pub fn finish(mut self) -> Document {
        recompute_rollup(&mut self.root);
        tracing::debug!(
            sections = self.root.sections().count(),
            tests = self.root.attribute("tests").unwrap_or("0"),
            "merge finished"
        );
        Document::with_root(self.root)
    }
}

/// Merge `sources` in order into one document.
///
/// An empty input yields `<testsuites>` with no attributes and no children.
#[must_use]
pub fn merge(sources: impl IntoIterator<Item = Document>) -> Document {
    let mut merger = Merger::new();
    for source in sources {
        merger.fold_document(source);
    }
    merger.finish()
}
