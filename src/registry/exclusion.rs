//! Exclusion set loading.
//!
//! The registry is plain text with one group label per line. Lines are
//! trimmed, blank lines and `#` comments are ignored, and lines starting with
//! `.` are sentinel markers (such as `.NOGROUP-ASSIGNED`) rather than real
//! group labels.

use std::collections::HashSet;
use std::path::Path;

use super::RegistryError;

/// Prefix of sentinel markers
pub const SENTINEL_PREFIX: char = '.';

/// Prefix of comment lines
pub const COMMENT_PREFIX: char = '#';

/// Group labels whose entries are never materialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    groups: HashSet<String>,
    sentinels: HashSet<String>,
}

impl ExclusionSet {
    /// Build a set from labels; labels starting with `.` become sentinels
    pub fn from_labels(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut set = Self::default();
        for label in labels {
            set.insert(label.into());
        }
        set
    }

    /// Parse registry text
    pub fn parse(text: &str) -> Self {
        let mut set = Self::default();
        for line in text.lines() {
            let label = line.trim();
            if label.is_empty() || label.starts_with(COMMENT_PREFIX) {
                continue;
            }
            set.insert(label.to_string());
        }
        set
    }

    /// Load a registry file
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let set = Self::parse(&String::from_utf8_lossy(&bytes));
        if set.is_empty() {
            tracing::warn!("Exclusion registry {} lists no groups", path.display());
        }
        Ok(set)
    }

    fn insert(&mut self, label: String) {
        if label.starts_with(SENTINEL_PREFIX) {
            self.sentinels.insert(label);
        } else {
            self.groups.insert(label);
        }
    }

    /// Whether entries under `label` are excluded
    pub fn contains(&self, label: &str) -> bool {
        self.groups.contains(label) || self.sentinels.contains(label)
    }

    /// Whether `label` is a sentinel marker present in the registry
    pub fn has_sentinel(&self, label: &str) -> bool {
        self.sentinels.contains(label)
    }

    /// Real group labels
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Sentinel markers
    pub fn sentinels(&self) -> impl Iterator<Item = &str> {
        self.sentinels.iter().map(String::as_str)
    }

    /// Number of real group labels
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when neither groups nor sentinels are listed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.sentinels.is_empty()
    }
}
