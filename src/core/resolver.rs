//! Destination path derivation.
//!
//! ```text
//! <output>/<movies>/<group>/<name>.strm
//! <output>/<channels>/<group>/<name>.strm
//! <output>/<series>/<group>/<series name>/<name>.strm
//! <output>/OTHERS/<group or .NOGROUP-ASSIGNED>/<series name>/<name>.strm
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::error::{EntryError, NameComponent};
use super::sanitizer::NameSanitizer;
use crate::config::CategoryDirs;
use crate::domain::{display_group, Category};

/// Extension of reference files
pub const REFERENCE_EXTENSION: &str = "strm";

/// Fixed subdirectory for the `Other` category
pub const OTHERS_DIR: &str = "OTHERS";

static EPISODE_MARKER: OnceLock<Regex> = OnceLock::new();

fn episode_marker() -> &'static Regex {
    EPISODE_MARKER
        .get_or_init(|| Regex::new(r" S\d+ E\d+\s*$").expect("episode marker pattern is valid"))
}

/// Strip a trailing `" S<n> E<n>"` episode marker from a display name
pub fn series_name(display_name: &str) -> &str {
    match episode_marker().find(display_name) {
        Some(m) => &display_name[..m.start()],
        None => display_name,
    }
}

/// Where an entry's reference file goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPath {
    /// Directory holding the reference file
    pub directory: PathBuf,

    /// Sanitized display name (file stem)
    pub name: String,
}

impl DestinationPath {
    /// Full path of the reference file
    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.name, REFERENCE_EXTENSION))
    }
}

/// Computes destination paths from configuration
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    output_root: &'a Path,
    dirs: &'a CategoryDirs,
    sanitizer: &'a NameSanitizer,
}

impl<'a> PathResolver<'a> {
    pub fn new(output_root: &'a Path, dirs: &'a CategoryDirs, sanitizer: &'a NameSanitizer) -> Self {
        Self {
            output_root,
            dirs,
            sanitizer,
        }
    }

    /// Top-level directory of a category
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.output_root.join(self.dirs.get(category))
    }

    /// Resolve the destination of an entry
    pub fn resolve(
        &self,
        category: Category,
        group_title: &str,
        display_name: &str,
    ) -> Result<DestinationPath, EntryError> {
        let group = non_empty(
            self.sanitizer.directory(display_group(group_title)),
            NameComponent::Group,
            group_title,
        )?;
        let mut directory = self.category_dir(category).join(group);

        if category.has_series_container() {
            let raw_series = series_name(display_name);
            let series = non_empty(
                self.sanitizer.directory(raw_series),
                NameComponent::Series,
                raw_series,
            )?;
            directory.push(series);
        }

        let name = non_empty(self.sanitizer.file(display_name), NameComponent::File, display_name)?;

        Ok(DestinationPath { directory, name })
    }
}

/// A component that is empty or made only of dots (`.`, `..`) names no entry
/// of its own and would resolve outside its parent directory.
fn non_empty(sanitized: String, component: NameComponent, raw: &str) -> Result<String, EntryError> {
    if sanitized.chars().all(|c| c == '.') {
        Err(EntryError::DegenerateName {
            component,
            raw: raw.to_string(),
        })
    } else {
        Ok(sanitized)
    }
}
