//! Exclusion registry generation.
//!
//! Lists every group label of a manifest so users can delete the lines of
//! the groups they want materialized. Everything listed stays excluded.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

use super::{write_with_backup, RegistryError, WriteReport};
use crate::core::scanner::{extract_attribute, is_metadata_line, GROUP_TITLE_ATTR};
use crate::domain::NO_GROUP_SENTINEL;

/// Header written at the top of a generated registry
pub const REGISTRY_HEADER: &str = "\
################################################################################
# DELETE ONLY THE GROUPS YOU WANT TO BE MATERIALIZED
# .NOGROUP-ASSIGNED stands for entries without a group-title
################################################################################
";

/// Distinct group labels found in a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupListing {
    /// Non-empty, trimmed group labels
    pub groups: BTreeSet<String>,

    /// Whether any entry had an empty or missing group title
    pub has_empty_group: bool,

    /// Number of metadata lines seen
    pub entries: usize,
}

impl GroupListing {
    /// Groups in registry order: channels (`|`), then `VOD…`, then `SRS…`,
    /// then everything else. Each section is sorted; each group appears once.
    pub fn ordered(&self) -> Vec<&str> {
        let mut sections: [Vec<&str>; 4] = Default::default();

        for group in &self.groups {
            let section = if group.contains('|') {
                0
            } else if group.starts_with("VOD") {
                1
            } else if group.starts_with("SRS") {
                2
            } else {
                3
            };
            sections[section].push(group.as_str());
        }

        // BTreeSet iteration already sorted each section
        sections.into_iter().flatten().collect()
    }

    /// Render the registry file
    pub fn render(&self) -> String {
        let mut out = String::from(REGISTRY_HEADER);
        if self.has_empty_group {
            out.push_str(NO_GROUP_SENTINEL);
            out.push('\n');
        }
        for group in self.ordered() {
            out.push_str(group);
            out.push('\n');
        }
        out
    }
}

/// Collect the group labels of every metadata line
pub fn collect_groups<R: BufRead>(reader: R) -> std::io::Result<GroupListing> {
    let mut listing = GroupListing::default();

    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if !is_metadata_line(&line) {
            continue;
        }
        listing.entries += 1;

        let group = extract_attribute(&line, GROUP_TITLE_ATTR)
            .map(str::trim)
            .unwrap_or_default();
        if group.is_empty() {
            listing.has_empty_group = true;
        } else {
            listing.groups.insert(group.to_string());
        }
    }

    Ok(listing)
}

/// Write a generated registry, backing up any existing file first
pub fn write_registry(path: &Path, listing: &GroupListing) -> Result<WriteReport, RegistryError> {
    write_with_backup(path, &listing.render()).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
