//! Attribute aggregation policy.
//!
//! A fixed table of the JUnit counters that are combined when two sections
//! with the same identity are merged:
//!
//! | attribute    | aggregator | rollup |
//! |--------------|------------|--------|
//! | `tests`      | sum        | yes    |
//! | `failures`   | sum        | yes    |
//! | `errors`     | sum        | yes    |
//! | `skipped`    | sum        | yes    |
//! | `time`       | max        | yes    |
//! | `assertions` | sum        | no     |
//! | `warnings`   | sum        | no     |
//!
//! `rollup` attributes are also recomputed on the `<testsuites>` root from its
//! immediate sections. `time` uses max because reports are usually produced by
//! parallel runs. Attributes missing from the table are never aggregated.

use std::borrow::Cow;

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// How two numeric values of one attribute are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregator {
    /// `a + b`
    Sum,
    /// `max(a, b)`
    Max,
}

impl Aggregator {
    /// Combine two values.
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Sum => a + b,
            Self::Max => a.max(b),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy table
// ---------------------------------------------------------------------------

/// One row of the policy table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyEntry {
    /// Attribute name.
    pub name: &'static str,
    /// How values are combined.
    pub aggregator: Aggregator,
    /// Whether the root `<testsuites>` carries the aggregate of its sections.
    pub rollup: bool,
}

const fn entry(name: &'static str, aggregator: Aggregator, rollup: bool) -> PolicyEntry {
    PolicyEntry {
        name,
        aggregator,
        rollup,
    }
}

/// The known attributes, in rollup order.
pub static KNOWN_ATTRIBUTES: [PolicyEntry; 7] = [
    entry("tests", Aggregator::Sum, true),
    entry("failures", Aggregator::Sum, true),
    entry("errors", Aggregator::Sum, true),
    entry("skipped", Aggregator::Sum, true),
    entry("time", Aggregator::Max, true),
    entry("assertions", Aggregator::Sum, false),
    entry("warnings", Aggregator::Sum, false),
];

/// The policy entry for `name`, if the attribute is aggregated at all.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static PolicyEntry> {
    KNOWN_ATTRIBUTES.iter().find(|e| e.name == name)
}

/// Entries whose aggregate is propagated to the root, in table order.
pub fn rollup_entries() -> impl Iterator<Item = &'static PolicyEntry> {
    KNOWN_ATTRIBUTES.iter().filter(|e| e.rollup)
}

/// Names of the rollup attributes, in table order.
pub fn rollup_attribute_names() -> impl Iterator<Item = &'static str> {
    rollup_entries().map(|e| e.name)
}

/// `true` if `name` is owned by the rollup step.
#[must_use]
pub fn is_rollup_attribute(name: &str) -> bool {
    lookup(name).is_some_and(|e| e.rollup)
}

// ---------------------------------------------------------------------------
// Counter
// ---------------------------------------------------------------------------

/// A numeric attribute value together with its spelling.
///
/// A maximum selects one of its operands and keeps that operand's spelling,
/// so `max("1.5", "2.0")` stays `"2.0"` instead of becoming `"2"`. A sum is a
/// new number and is always written in shortest form, so `0 + "007"` gives
/// `"7"`.
#[derive(Clone, Debug, PartialEq)]
pub struct Counter<'a> {
    value: f64,
    text: Cow<'a, str>,
}

impl<'a> Counter<'a> {
    /// Parse an attribute value; `None` if it is not a finite decimal number.
    #[must_use]
    pub fn parse(text: &'a str) -> Option<Self> {
        let trimmed = text.trim_ascii();
        if trimmed.is_empty() {
            return None;
        }
        let value: f64 = trimmed.parse().ok()?;
        value.is_finite().then_some(Self {
            value,
            text: Cow::Borrowed(text),
        })
    }

    /// The numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Combine with `other`; a max tie keeps `self`'s spelling.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn combine(self, other: Self, aggregator: Aggregator) -> Self {
        let value = aggregator.apply(self.value, other.value);
        match aggregator {
            Aggregator::Max if value == self.value => Self { value, ..self },
            Aggregator::Max if value == other.value => Self { value, ..other },
            Aggregator::Sum | Aggregator::Max => Self {
                value,
                text: Cow::Owned(format_number(value)),
            },
        }
    }

    /// The attribute value to write.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text.into_owned()
    }
}

/// Shortest decimal form of `value`: `5`, `3.5`, `0.30000000000000004`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // normalizes -0
        "0".to_owned()
    } else {
        value.to_string()
    }
}

/// Aggregate two values of attribute `name`.
///
/// Returns `None` when the attribute is not in the policy or either side is
/// not numeric; the caller then keeps its current value.
#[must_use]
pub fn aggregate(name: &str, current: &str, incoming: &str) -> Option<String> {
    let entry = lookup(name)?;
    let current = Counter::parse(current)?;
    let incoming = Counter::parse(incoming)?;
    Some(current.combine(incoming, entry.aggregator).into_text())
}
