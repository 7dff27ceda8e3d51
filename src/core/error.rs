//! Error types for manifest processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while scanning a manifest
#[derive(Debug, Error)]
pub enum ScanError {
    /// Metadata line at the end of the manifest with no locator after it
    #[error("Metadata line {line} has no locator line after it")]
    MissingLocator { line: usize },

    /// The manifest could not be read any further
    #[error("IO error while reading manifest: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort the processing of a single entry.
///
/// These are collected into the run result; they never stop the run.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Metadata line {line} has no locator line after it")]
    MissingLocator { line: usize },

    #[error("Sanitized {component} name is empty (raw: {raw:?})")]
    DegenerateName {
        component: NameComponent,
        raw: String,
    },

    #[error("Failed to write reference file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which part of a destination path a name was sanitized for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameComponent {
    Group,
    Series,
    File,
}

impl std::fmt::Display for NameComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameComponent::Group => write!(f, "group"),
            NameComponent::Series => write!(f, "series"),
            NameComponent::File => write!(f, "file"),
        }
    }
}
