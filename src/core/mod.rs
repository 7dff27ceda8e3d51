//! Manifest processing.
//!
//! This module contains:
//! - PlaylistScanner: Streaming manifest reader
//! - GroupClassifier: Group label to category
//! - NameSanitizer / PathResolver: Destination paths
//! - ReferenceWriter: Create-once reference files
//! - ResultAggregator: Per-run outcomes
//! - Engine: One pass tying them together

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod sanitizer;
pub mod scanner;
pub mod writer;

// Re-export commonly used types
pub use aggregator::{CategoryResult, EntryFailure, ResultAggregator, RunResult};
pub use classifier::{classify, other_group_guard, GroupClassifier, OtherGroupGuard};
pub use engine::Engine;
pub use error::{EntryError, NameComponent, ScanError};
pub use resolver::{series_name, DestinationPath, PathResolver};
pub use sanitizer::{NameFlavor, NameSanitizer};
pub use scanner::PlaylistScanner;
pub use writer::{ReferenceWriter, WriteOutcome};
