//! Group label classification.
//!
//! Classification is a pure function of the group label and the exclusion
//! set. Rules are evaluated in table order and the first match wins; labels
//! such as `VOD|Action` match several rules, so the order is part of the
//! contract.

use crate::domain::{display_group, Category, Classification};
use crate::registry::ExclusionSet;

/// Test applied to a group label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Label contains the substring
    Contains(&'static str),

    /// Label contains the character
    ContainsChar(char),
}

impl Predicate {
    /// Evaluate the predicate against a label
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Predicate::Contains(needle) => label.contains(needle),
            Predicate::ContainsChar(c) => label.contains(*c),
        }
    }
}

/// A predicate and the category it assigns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    pub predicate: Predicate,
    pub category: Category,
}

/// Ordered classification rules. Labels matching none of them are `Other`.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        predicate: Predicate::Contains("VOD"),
        category: Category::Movie,
    },
    ClassificationRule {
        predicate: Predicate::Contains("SRS"),
        category: Category::Series,
    },
    ClassificationRule {
        predicate: Predicate::ContainsChar('|'),
        category: Category::Channel,
    },
];

/// Classifies group labels against an exclusion set
#[derive(Debug, Clone, Copy)]
pub struct GroupClassifier<'a> {
    exclusions: &'a ExclusionSet,
}

impl<'a> GroupClassifier<'a> {
    /// Create a classifier for one run's exclusion set
    pub fn new(exclusions: &'a ExclusionSet) -> Self {
        Self { exclusions }
    }

    /// Classify a raw group title
    pub fn classify(&self, group_title: &str) -> Classification {
        classify(group_title, self.exclusions)
    }

    /// Guard applied on the `Other` path, see [`other_group_guard`]
    pub fn other_group_guard(&self, group_title: &str) -> OtherGroupGuard {
        other_group_guard(group_title, self.exclusions)
    }
}

/// Classify a raw group title
pub fn classify(group_title: &str, exclusions: &ExclusionSet) -> Classification {
    if exclusions.contains(group_title) {
        return Classification::Excluded;
    }

    let category = CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.predicate.matches(group_title))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other);

    Classification::Classified(category)
}

/// Result of the second exclusion check on the `Other` path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherGroupGuard {
    /// Entry may be materialized
    Pass,

    /// Display label (after sentinel substitution) is excluded
    Excluded,
}

/// Re-check exclusion for an `Other` entry using its display label.
///
/// The first check in [`classify`] sees the raw title, so an empty title can
/// only be excluded here, via the `.NOGROUP-ASSIGNED` sentinel. For non-empty
/// titles this repeats the first check and always passes.
pub fn other_group_guard(group_title: &str, exclusions: &ExclusionSet) -> OtherGroupGuard {
    if exclusions.contains(display_group(group_title)) {
        OtherGroupGuard::Excluded
    } else {
        OtherGroupGuard::Pass
    }
}
