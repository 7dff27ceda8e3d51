//! Reference file materialization.
//!
//! A reference file is created at most once: an existing file is reported as
//! skipped and left untouched. Contents are written to a temporary sibling
//! first, so a reference file is either complete or absent.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::Builder;

use super::error::EntryError;

/// Prefix of in-flight temporary files; never ends in `.strm`
const TEMP_PREFIX: &str = ".strmgen-";
const TEMP_SUFFIX: &str = ".tmp";

/// Result of a write attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was written
    Created,

    /// The file already existed
    Skipped,
}

/// Writes reference files without ever overwriting
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceWriter;

impl ReferenceWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` to `path` unless the file exists.
    ///
    /// Missing ancestors are created; directories created concurrently by
    /// someone else are fine. The content goes to a temporary file in the
    /// same directory, which is then moved into place with
    /// `persist_noclobber`: a concurrent writer that got there first wins and
    /// this call reports `Skipped`. On any failure the temporary file is
    /// dropped, which deletes it.
    pub fn write(&self, path: &Path, content: &str) -> Result<WriteOutcome, EntryError> {
        if path.exists() {
            return Ok(WriteOutcome::Skipped);
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;

        let mut temp = Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(parent)
            .map_err(|e| write_error(path, e))?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| write_error(path, e))?;

        match temp.persist_noclobber(path) {
            Ok(_) => Ok(WriteOutcome::Created),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(WriteOutcome::Skipped),
            Err(e) => Err(write_error(path, e.error)),
        }
    }
}

fn write_error(path: &Path, source: std::io::Error) -> EntryError {
    EntryError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_parents_and_writes_verbatim() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("FILMS/VOD Action/Movie One.strm");

        let outcome = ReferenceWriter::new().write(&path, "http://x/1.ts").unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "http://x/1.ts");
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("TV/FR News");
        let writer = ReferenceWriter::new();

        writer.write(&dir.join("One.strm"), "http://x/1").unwrap();
        writer.write(&dir.join("Two.strm"), "http://x/2").unwrap();
        writer.write(&dir.join("One.strm"), "http://x/3").unwrap();

        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["One.strm", "Two.strm"]);
    }

    #[test]
    fn test_noclobber_move_reports_existing_target() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Movie.strm");

        // Another writer creates the file between our existence check and the
        // final move
        let mut pending = Builder::new().tempfile_in(temp.path()).unwrap();
        pending.write_all(b"http://ours").unwrap();
        std::fs::write(&path, "http://theirs").unwrap();

        let err = pending.persist_noclobber(&path).unwrap_err();
        assert_eq!(err.error.kind(), ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "http://theirs");
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Movie.strm");
        std::fs::write(&path, "http://old").unwrap();

        let outcome = ReferenceWriter::new().write(&path, "http://new").unwrap();

        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "http://old");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        // A regular file where a directory is needed
        let blocker = temp.path().join("FILMS");
        std::fs::write(&blocker, "").unwrap();

        let result = ReferenceWriter::new().write(&blocker.join("Group/Movie.strm"), "http://x");

        assert!(matches!(result, Err(EntryError::Write { .. })));
    }
}
