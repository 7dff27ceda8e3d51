//! Sequential manifest scanner.
//!
//! Pairs every `#EXTINF` metadata line with the line that follows it. The
//! scanner is a lazy, single-pass iterator over any `BufRead`; re-scanning
//! means re-opening the source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use super::error::ScanError;
use crate::domain::{PlaylistEntry, UNKNOWN_NAME};

/// Prefix that marks a metadata line
pub const METADATA_MARKER: &str = "#EXTINF";

/// Attribute carrying the group label
pub const GROUP_TITLE_ATTR: &str = "group-title=";

/// Attribute carrying the display name
pub const TVG_NAME_ATTR: &str = "tvg-name=";

/// Lazy iterator over the entries of a manifest
pub struct PlaylistScanner<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    done: bool,
}

impl PlaylistScanner<BufReader<File>> {
    /// Open a manifest file for scanning
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open manifest: {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> PlaylistScanner<R> {
    /// Create a scanner over a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Read the next line without its terminator. Invalid UTF-8 is replaced.
    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let line = String::from_utf8_lossy(&self.buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn fail(&mut self, err: ScanError) -> Option<Result<PlaylistEntry, ScanError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for PlaylistScanner<R> {
    type Item = Result<PlaylistEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => return self.fail(e.into()),
            };

            if !is_metadata_line(&line) {
                continue;
            }
            let metadata_line = self.line_no;

            // The following line is the locator, whatever it contains
            let locator = match self.next_line() {
                Ok(Some(locator)) => locator.trim().to_string(),
                Ok(None) => {
                    return self.fail(ScanError::MissingLocator {
                        line: metadata_line,
                    })
                }
                Err(e) => return self.fail(e.into()),
            };

            return Some(Ok(parse_metadata(&line, locator).at_line(metadata_line)));
        }
    }
}

/// Check whether a line starts a manifest entry
pub fn is_metadata_line(line: &str) -> bool {
    line.trim_start_matches('\u{feff}')
        .starts_with(METADATA_MARKER)
}

/// Build an entry from a metadata line and its locator
pub fn parse_metadata(line: &str, locator: String) -> PlaylistEntry {
    let group_title = extract_attribute(line, GROUP_TITLE_ATTR).unwrap_or_default();
    let display_name = extract_attribute(line, TVG_NAME_ATTR).unwrap_or(UNKNOWN_NAME);

    PlaylistEntry::new(group_title, display_name, locator)
}

/// Extract the quoted value following the first occurrence of `marker`.
///
/// Returns `None` when the marker is absent or the value is unterminated.
/// Quotes cannot be escaped.
pub fn extract_attribute<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let after_marker = &line[line.find(marker)? + marker.len()..];
    let value = &after_marker[after_marker.find('"')? + 1..];
    let end = value.find('"')?;
    Some(&value[..end])
}
