//! strmgen - IPTV manifest to `.strm` library generator
//!
//! Reads an extended M3U manifest, classifies every entry by its group label
//! and materializes one `.strm` reference file per entry in a categorized
//! directory tree that media servers can index.
//!
//! # Architecture
//!
//! A run is a single pass over the manifest:
//! - Entries whose group is listed in the exclusion registry are dropped
//! - The rest are classified (Movie, Series, Channel, Other)
//! - Names are sanitized into a destination path
//! - The reference file is created unless it already exists
//!
//! Re-running on the same manifest creates nothing new.
//!
//! # Modules
//!
//! - `core`: Manifest processing (scanner, classifier, resolver, writer, engine)
//! - `domain`: Data structures (PlaylistEntry, Category, RunReport)
//! - `registry`: Exclusion registry loading and generation
//! - `adapters`: External systems (provider download, Discord)
//! - `report`: Run logs and console summaries
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List the manifest's groups, then edit the registry
//! strmgen groups
//!
//! # Materialize the library
//! strmgen run
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod registry;
pub mod report;

// Re-export main types at crate root for convenience
pub use core::{Engine, RunResult};
pub use domain::{Category, Classification, PlaylistEntry, RunReport};
pub use registry::ExclusionSet;
