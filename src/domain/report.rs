//! Run report handed to notifiers and log writers.
//!
//! Plain structured data with no references back into the engine, so it can
//! be serialized, logged or posted as-is.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Per-category counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Reference files created by this run
    pub created: usize,

    /// Entries whose reference file already existed
    pub skipped: usize,

    /// Skipped entries whose file was created earlier in the same run
    pub duplicates: usize,

    /// Entries that failed with a recoverable error
    pub failed: usize,
}

impl CategoryCounts {
    /// Reference files this manifest accounts for in the library
    pub fn in_total(&self) -> usize {
        self.created + self.skipped - self.duplicates
    }
}

/// Summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Counters for every category, in reporting order
    pub categories: Vec<(Category, CategoryCounts)>,

    /// Entries dropped by the exclusion set
    pub excluded: usize,

    /// Entries that failed before they could be classified
    pub unclassified_failures: usize,

    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,

    /// Human-readable duration ("2 min 3.50 s")
    pub duration: String,
}

impl RunReport {
    /// Counters for one category
    pub fn counts(&self, category: Category) -> CategoryCounts {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, counts)| counts.clone())
            .unwrap_or_default()
    }

    /// Reference files created across all categories
    pub fn total_created(&self) -> usize {
        self.categories.iter().map(|(_, c)| c.created).sum()
    }

    /// Recoverable failures across the whole run
    pub fn total_failed(&self) -> usize {
        self.unclassified_failures + self.categories.iter().map(|(_, c)| c.failed).sum::<usize>()
    }
}

/// Format a duration as minutes and seconds with two decimals.
///
/// Rounds to centiseconds before splitting, so 59.996 s is `1 min 0.00 s`.
pub fn format_duration(elapsed: Duration) -> String {
    let centis = (elapsed.as_millis() + 5) / 10;
    let minutes = centis / 6_000;
    let rest = centis % 6_000;
    format!("{} min {}.{:02} s", minutes, rest / 100, rest % 100)
}
