//! Main engine for manifest processing.
//!
//! One pass over the manifest, in manifest order: classify each entry,
//! resolve its destination, write its reference file, record the outcome.
//! Only an unreadable manifest stops a run; every other problem is recorded
//! against the entry and processing continues.

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::config::ResolvedConfig;
use crate::domain::{Category, Classification, PlaylistEntry};
use crate::registry::ExclusionSet;

use super::aggregator::{EntryFailure, ResultAggregator, RunResult};
use super::classifier::{GroupClassifier, OtherGroupGuard};
use super::error::{EntryError, ScanError};
use super::resolver::PathResolver;
use super::sanitizer::NameSanitizer;
use super::scanner::PlaylistScanner;
use super::writer::{ReferenceWriter, WriteOutcome};

/// Manifest processing engine for one output tree
pub struct Engine<'a> {
    classifier: GroupClassifier<'a>,
    resolver: PathResolver<'a>,
    writer: ReferenceWriter,
}

impl<'a> Engine<'a> {
    /// Create an engine from its collaborators
    pub fn new(classifier: GroupClassifier<'a>, resolver: PathResolver<'a>) -> Self {
        Self {
            classifier,
            resolver,
            writer: ReferenceWriter::new(),
        }
    }

    /// Create an engine writing under `output_root`
    pub fn from_config(
        config: &'a ResolvedConfig,
        output_root: &'a Path,
        exclusions: &'a ExclusionSet,
        sanitizer: &'a NameSanitizer,
    ) -> Self {
        Self::new(
            GroupClassifier::new(exclusions),
            PathResolver::new(output_root, &config.categories, sanitizer),
        )
    }

    /// Process a manifest file
    #[instrument(skip(self, manifest), fields(manifest = %manifest.display()))]
    pub fn run_file(&self, manifest: &Path) -> Result<RunResult> {
        let scanner = PlaylistScanner::open(manifest)?;
        self.run_scanner(scanner)
            .with_context(|| format!("Failed to read manifest: {}", manifest.display()))
    }

    /// Process a manifest from any reader
    pub fn run<R: BufRead>(&self, reader: R) -> Result<RunResult> {
        self.run_scanner(PlaylistScanner::new(reader))
    }

    fn run_scanner<R: BufRead>(&self, scanner: PlaylistScanner<R>) -> Result<RunResult> {
        let mut aggregator = ResultAggregator::new();

        for item in scanner {
            match item {
                Ok(entry) => self.process(&entry, &mut aggregator),
                Err(ScanError::MissingLocator { line }) => {
                    warn!(line, "Metadata line without locator, entry dropped");
                    aggregator.record_failure(
                        None,
                        EntryFailure {
                            line,
                            group: String::new(),
                            name: String::new(),
                            error: EntryError::MissingLocator { line },
                        },
                    );
                }
                Err(ScanError::Io(e)) => return Err(e.into()),
            }
        }

        let result = aggregator.finish();
        for category in Category::ALL {
            let outcome = result.category(category);
            info!(
                category = %category,
                created = outcome.created_count(),
                skipped = outcome.skipped,
                failed = outcome.failures.len(),
                "Category processed"
            );
        }
        info!(
            created = result.total_created(),
            excluded = result.excluded,
            duration = %result.duration_string(),
            "Manifest processed"
        );

        Ok(result)
    }

    /// Process one entry; every outcome ends up in the aggregator
    fn process(&self, entry: &PlaylistEntry, aggregator: &mut ResultAggregator) {
        let category = match self.classifier.classify(&entry.group_title) {
            Classification::Excluded => {
                debug!(group = %entry.group_title, "Excluded group");
                aggregator.record_excluded();
                return;
            }
            Classification::Classified(category) => category,
        };

        if category == Category::Other
            && self.classifier.other_group_guard(&entry.group_title) == OtherGroupGuard::Excluded
        {
            debug!(group = %entry.display_group(), "Excluded group");
            aggregator.record_excluded();
            return;
        }

        let failure = |error: EntryError| EntryFailure {
            line: entry.line,
            group: entry.display_group().to_string(),
            name: entry.display_name.clone(),
            error,
        };

        let destination =
            match self
                .resolver
                .resolve(category, &entry.group_title, &entry.display_name)
            {
                Ok(destination) => destination,
                Err(error) => {
                    warn!(line = entry.line, %error, "Entry skipped");
                    aggregator.record_failure(Some(category), failure(error));
                    return;
                }
            };

        let path = destination.path();
        match self.writer.write(&path, &entry.locator) {
            Ok(WriteOutcome::Created) => {
                debug!(path = %path.display(), "Reference file created");
                aggregator.record_created(
                    category,
                    entry.display_group(),
                    destination.name,
                    path,
                );
            }
            Ok(WriteOutcome::Skipped) => {
                debug!(path = %path.display(), "Reference file exists");
                aggregator.record_skipped(category, &path);
            }
            Err(error) => {
                warn!(line = entry.line, %error, "Entry not written");
                aggregator.record_failure(Some(category), failure(error));
            }
        }
    }
}
