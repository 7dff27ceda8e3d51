//! Exclusion registry.
//!
//! The registry lists group labels that a run must skip. It is generated from
//! a manifest (`groups` command), edited by hand, then loaded once per run.

pub mod exclusion;
pub mod groups;

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use exclusion::ExclusionSet;
pub use groups::{collect_groups, write_registry, GroupListing};

/// Errors reading or writing the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Exclusion registry not found: {} (run `strmgen groups` to generate it)", .0.display())]
    NotFound(PathBuf),

    #[error("IO error on exclusion registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What [`write_with_backup`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// The file that was written
    pub path: PathBuf,

    /// Where the previous version was moved, if there was one
    pub backup: Option<PathBuf>,
}

/// Backup path for a file: `<file name>.old` next to it
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".old");
    path.with_file_name(name)
}

/// Replace a file's contents, moving the previous version to `<name>.old`.
///
/// The new contents are written to a temporary file in the same directory
/// and renamed into place.
pub fn write_with_backup(path: &Path, contents: &str) -> std::io::Result<WriteReport> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(contents.as_bytes())?;

    let backup = if path.exists() {
        let backup = backup_path(path);
        if backup.exists() {
            std::fs::remove_file(&backup)?;
        }
        std::fs::rename(path, &backup)?;
        Some(backup)
    } else {
        None
    };

    temp.persist(path).map_err(|e| e.error)?;

    Ok(WriteReport {
        path: path.to_path_buf(),
        backup,
    })
}
