//! Per-run result aggregation.
//!
//! Collects, per category, the names created for each group (in manifest
//! order), plus skip, duplicate and failure tallies. Nothing persists between
//! runs.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;

use super::error::EntryError;
use crate::domain::{format_duration, Category, CategoryCounts, RunReport};

/// A recoverable failure of one entry
#[derive(Debug)]
pub struct EntryFailure {
    /// Manifest line of the entry's metadata line
    pub line: usize,

    /// Display group label (empty when unknown)
    pub group: String,

    /// Raw display name (empty when unknown)
    pub name: String,

    pub error: EntryError,
}

/// Results for one category
#[derive(Debug, Default)]
pub struct CategoryResult {
    /// Group label -> names created in this run, in manifest order
    pub created: BTreeMap<String, Vec<String>>,

    /// Entries whose reference file already existed
    pub skipped: usize,

    /// Skipped entries whose file was created earlier in this run
    pub duplicates: usize,

    pub failures: Vec<EntryFailure>,
}

impl CategoryResult {
    /// Number of reference files created
    pub fn created_count(&self) -> usize {
        self.created.values().map(Vec::len).sum()
    }

    fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            created: self.created_count(),
            skipped: self.skipped,
            duplicates: self.duplicates,
            failed: self.failures.len(),
        }
    }
}

/// Outcome of a whole run
#[derive(Debug)]
pub struct RunResult {
    /// Results for every category
    pub categories: BTreeMap<Category, CategoryResult>,

    /// Entries dropped by the exclusion set
    pub excluded: usize,

    /// Failures that happened before an entry had a category
    pub unclassified_failures: Vec<EntryFailure>,

    /// Wall-clock duration of the scan
    pub elapsed: Duration,
}

impl RunResult {
    /// Results of one category
    pub fn category(&self, category: Category) -> &CategoryResult {
        &self.categories[&category]
    }

    /// Created counts per category
    pub fn totals_by_category(&self) -> BTreeMap<Category, usize> {
        self.categories
            .iter()
            .map(|(category, result)| (*category, result.created_count()))
            .collect()
    }

    /// Created count across all categories
    pub fn total_created(&self) -> usize {
        self.categories.values().map(CategoryResult::created_count).sum()
    }

    /// All recoverable failures, unclassified ones first
    pub fn failures(&self) -> impl Iterator<Item = &EntryFailure> {
        self.unclassified_failures
            .iter()
            .chain(self.categories.values().flat_map(|r| r.failures.iter()))
    }

    /// Human-readable elapsed time
    pub fn duration_string(&self) -> String {
        format_duration(self.elapsed)
    }

    /// Plain summary for notifiers and logs
    pub fn report(&self) -> RunReport {
        RunReport {
            finished_at: Utc::now(),
            categories: Category::ALL
                .iter()
                .map(|c| (*c, self.category(*c).counts()))
                .collect(),
            excluded: self.excluded,
            unclassified_failures: self.unclassified_failures.len(),
            elapsed_ms: self.elapsed.as_millis() as u64,
            duration: self.duration_string(),
        }
    }
}

/// Accumulates outcomes while a manifest is processed
#[derive(Debug)]
pub struct ResultAggregator {
    started: Instant,
    categories: BTreeMap<Category, CategoryResult>,
    excluded: usize,
    unclassified_failures: Vec<EntryFailure>,
    created_paths: HashSet<PathBuf>,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    /// Start aggregating; the clock starts now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            categories: Category::ALL
                .iter()
                .map(|c| (*c, CategoryResult::default()))
                .collect(),
            excluded: 0,
            unclassified_failures: Vec::new(),
            created_paths: HashSet::new(),
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut CategoryResult {
        self.categories.entry(category).or_default()
    }

    /// Record a newly created reference file
    pub fn record_created(&mut self, category: Category, group: &str, name: String, path: PathBuf) {
        self.category_mut(category)
            .created
            .entry(group.to_string())
            .or_default()
            .push(name);
        self.created_paths.insert(path);
    }

    /// Record an entry whose reference file already existed
    pub fn record_skipped(&mut self, category: Category, path: &Path) {
        let duplicate = self.created_paths.contains(path);
        let result = self.category_mut(category);
        result.skipped += 1;
        if duplicate {
            result.duplicates += 1;
        }
    }

    /// Record an entry dropped by the exclusion set
    pub fn record_excluded(&mut self) {
        self.excluded += 1;
    }

    /// Record a recoverable failure
    pub fn record_failure(&mut self, category: Option<Category>, failure: EntryFailure) {
        match category {
            Some(category) => self.category_mut(category).failures.push(failure),
            None => self.unclassified_failures.push(failure),
        }
    }

    /// Stop the clock and produce the run result
    pub fn finish(self) -> RunResult {
        RunResult {
            categories: self.categories,
            excluded: self.excluded,
            unclassified_failures: self.unclassified_failures,
            elapsed: self.started.elapsed(),
        }
    }
}
