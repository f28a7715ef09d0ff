//! ROLLUP step: recompute the root counters from its immediate sections.

use crate::model::Element;
use crate::policy::{self, Counter};

/// Overwrite each rollup attribute on `root` with the aggregate of that
/// attribute over `root`'s immediate `<testsuite>` children.
///
/// Children whose value is missing or non-numeric are skipped. When no child
/// carries a numeric value the attribute is left alone. The result never
/// depends on previous rollups, so this must run once, after all folds.
pub fn recompute_rollup(root: &mut Element) {
    for entry in policy::rollup_entries() {
        let total = root
            .sections()
            .filter_map(|section| section.attribute(entry.name))
            .filter_map(Counter::parse)
            .reduce(|acc, value| acc.combine(value, entry.aggregator))
            .map(Counter::into_text);
        if let Some(total) = total {
            root.set_attribute(entry.name, total);
        }
    }
}
