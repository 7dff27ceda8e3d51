//! Domain types for the library generator.
//!
//! This module contains the core data structures:
//! - Entry: one metadata/locator pair from a manifest
//! - Category: where an entry lands in the library
//! - Report: plain run summary for notifiers and logs

pub mod category;
pub mod entry;
pub mod report;

// Re-export commonly used types
pub use category::{Category, Classification};
pub use entry::{display_group, PlaylistEntry, NO_GROUP_SENTINEL, UNKNOWN_NAME};
pub use report::{format_duration, CategoryCounts, RunReport};
