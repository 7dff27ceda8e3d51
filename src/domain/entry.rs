//! Manifest entries.

use serde::{Deserialize, Serialize};

/// Label used for entries whose manifest line carries no group title
pub const NO_GROUP_SENTINEL: &str = ".NOGROUP-ASSIGNED";

/// Display name used when a metadata line has no `tvg-name` attribute
pub const UNKNOWN_NAME: &str = "Unknown";

/// One metadata/locator pair read from a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Raw `group-title` value (empty when absent)
    pub group_title: String,

    /// Raw `tvg-name` value
    pub display_name: String,

    /// Stream locator, written verbatim into the reference file
    pub locator: String,

    /// 1-based manifest line of the metadata line
    pub line: usize,
}

impl PlaylistEntry {
    /// Create a new entry
    pub fn new(
        group_title: impl Into<String>,
        display_name: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            group_title: group_title.into(),
            display_name: display_name.into(),
            locator: locator.into(),
            line: 0,
        }
    }

    /// Set the manifest line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Group label used for paths and reports.
    ///
    /// An empty group title maps to [`NO_GROUP_SENTINEL`]; classification
    /// always sees the raw title.
    pub fn display_group(&self) -> &str {
        display_group(&self.group_title)
    }
}

/// Map an empty group title to the sentinel label
pub fn display_group(group_title: &str) -> &str {
    if group_title.is_empty() {
        NO_GROUP_SENTINEL
    } else {
        group_title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_group_sentinel() {
        let entry = PlaylistEntry::new("", "Clip", "http://x/1.ts");
        assert_eq!(entry.display_group(), NO_GROUP_SENTINEL);

        let entry = PlaylistEntry::new("FR| News", "Clip", "http://x/1.ts");
        assert_eq!(entry.display_group(), "FR| News");
    }
}
