//! Run result logs and console summaries.
//!
//! Each run appends to timestamped text files in the log directory:
//! `New<Category>-<HH-MM-dd-YYYY>.txt` listing what was created, grouped by
//! group label, and `RunSummary-<stamp>.txt` with the totals.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};

use crate::core::RunResult;
use crate::domain::{Category, RunReport};

/// Timestamp format used in log file names
pub const LOG_STAMP_FORMAT: &str = "%H-%M-%d-%Y";

const SEPARATOR: &str = "---------------------------------------------------";
const GROUP_SEPARATOR: &str = "--------------------";

/// File name stem of a category's creation log
fn log_stem(category: Category) -> &'static str {
    match category {
        Category::Movie => "NewFilms",
        Category::Series => "NewSeries",
        Category::Channel => "NewTV",
        Category::Other => "NewOthers",
    }
}

/// Append the result logs of a run to `dir`; returns the files written
pub fn write_run_logs<Tz>(dir: &Path, result: &RunResult, now: DateTime<Tz>) -> Result<Vec<PathBuf>>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let stamp = now.format(LOG_STAMP_FORMAT).to_string();
    let mut written = Vec::new();

    for category in Category::ALL {
        let outcome = result.category(category);
        if outcome.created.is_empty() {
            continue;
        }

        let mut text = format!("Log for {}\n", now);
        for (group, names) in &outcome.created {
            text.push_str(&format!("{}\n{}\n", GROUP_SEPARATOR, group));
            for name in names {
                text.push_str(name);
                text.push('\n');
            }
        }
        text.push_str(SEPARATOR);
        text.push('\n');

        let path = dir.join(format!("{}-{}.txt", log_stem(category), stamp));
        append(&path, &text)?;
        written.push(path);
    }

    let report = result.report();
    let mut text = format!("Run finished at {}\n", now);
    for category in Category::ALL {
        text.push_str(&format!(
            "Total {} added: {}\n",
            category.label(),
            report.counts(category).created
        ));
    }
    text.push_str(&format!("Excluded entries: {}\n", report.excluded));
    text.push_str(&format!("Failed entries: {}\n", report.total_failed()));
    text.push_str(&format!("Processing time: {}\n", report.duration));
    text.push_str(SEPARATOR);
    text.push('\n');

    let path = dir.join(format!("RunSummary-{}.txt", stamp));
    append(&path, &text)?;
    written.push(path);

    Ok(written)
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to write log file: {}", path.display()))
}

/// Console summary lines, one per category with activity, then the timing.
///
/// `Movies summary: 3 new, 10 skipped (whereof 1 dupes), 12 in total`
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .categories
        .iter()
        .filter(|(category, counts)| {
            *category != Category::Other || counts.created + counts.skipped > 0
        })
        .map(|(category, counts)| {
            format!(
                "{} summary: {} new, {} skipped (whereof {} dupes), {} in total",
                category.label(),
                counts.created,
                counts.skipped,
                counts.duplicates,
                counts.in_total()
            )
        })
        .collect();

    let failed = report.total_failed();
    if failed > 0 {
        lines.push(format!("{} entries failed", failed));
    }
    lines.push(format!("Processing time: {}", report.duration));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResultAggregator;
    use chrono::Local;
    use tempfile::TempDir;

    fn result() -> RunResult {
        let mut aggregator = ResultAggregator::new();
        aggregator.record_created(
            Category::Movie,
            "VOD|Action",
            "Movie One".to_string(),
            PathBuf::from("/lib/FILMS/VOD Action/Movie One.strm"),
        );
        aggregator.record_created(
            Category::Movie,
            "VOD|Action",
            "Movie Two".to_string(),
            PathBuf::from("/lib/FILMS/VOD Action/Movie Two.strm"),
        );
        aggregator.record_skipped(Category::Channel, Path::new("/lib/TV/FR/Chan.strm"));
        aggregator.finish()
    }

    #[test]
    fn test_write_run_logs() {
        let temp = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();

        let written = write_run_logs(temp.path(), &result(), now).unwrap();

        assert_eq!(
            written,
            vec![
                temp.path().join("NewFilms-14-05-09-2024.txt"),
                temp.path().join("RunSummary-14-05-09-2024.txt"),
            ]
        );

        let films = std::fs::read_to_string(&written[0]).unwrap();
        assert!(films.contains("--------------------\nVOD|Action\nMovie One\nMovie Two\n"));

        let summary = std::fs::read_to_string(&written[1]).unwrap();
        assert!(summary.contains("Total Movies added: 2\n"));
        assert!(summary.contains("Total TV-channels added: 0\n"));
    }

    #[test]
    fn test_write_run_logs_appends() {
        let temp = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();

        write_run_logs(temp.path(), &result(), now).unwrap();
        write_run_logs(temp.path(), &result(), now).unwrap();

        let summary =
            std::fs::read_to_string(temp.path().join("RunSummary-14-05-09-2024.txt")).unwrap();
        assert_eq!(summary.matches("Run finished at").count(), 2);
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&result().report());

        assert_eq!(
            lines[0],
            "Movies summary: 2 new, 0 skipped (whereof 0 dupes), 2 in total"
        );
        assert_eq!(
            lines[2],
            "TV-channels summary: 0 new, 1 skipped (whereof 0 dupes), 1 in total"
        );
        // Others are only listed when something happened
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("Processing time: 0 min "));
    }
}
