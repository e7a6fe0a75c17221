//! Batch ingestion: read log files line by line into a record set.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parsers::{Extraction, FieldExtractor};
use crate::record::{normalize, Record, Rejected};

/// File-level failure that aborts the whole load.
///
/// Per-line extraction and normalization failures never escalate; only
/// opening a file or reading/decoding one of its lines can produce this.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        /// 1-based number of the line being read when the failure occurred
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Counters for one load pass, reported to the caller and logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: usize,
    pub lines: usize,
    pub records: usize,
    pub not_matched: usize,
    pub bad_timestamp: usize,
    pub bad_head: usize,
    pub filtered_out: usize,
    pub bad_number: usize,
}

impl LoadSummary {
    /// Lines seen that produced no record, for whatever reason
    pub fn skipped(&self) -> usize {
        self.lines - self.records
    }
}

fn ingest_file(
    path: &Path,
    extractor: &dyn FieldExtractor,
    records: &mut Vec<Record>,
    summary: &mut LoadSummary,
) -> Result<(), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    for (index, line) in reader.lines().enumerate() {
        // Invalid UTF-8 or a mid-file read failure surfaces here with the
        // 1-based line number reached so far.
        let line = line.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        summary.lines += 1;

        match extractor.extract(&line) {
            Extraction::NotMatched => summary.not_matched += 1,
            Extraction::Extracted(fields) => match normalize(&fields) {
                Ok(record) => {
                    records.push(record);
                    summary.records += 1;
                }
                Err(Rejected::BadTimestamp) => summary.bad_timestamp += 1,
                Err(Rejected::BadHead) => summary.bad_head += 1,
                Err(Rejected::FilteredOut) => summary.filtered_out += 1,
                Err(Rejected::BadNumber) => summary.bad_number += 1,
            },
        }
    }

    summary.files += 1;
    Ok(())
}

/// Read every path line by line, accumulating normalized `Place` records.
///
/// Lines that fail extraction or normalization are dropped silently and
/// counted. A file-level failure aborts the whole load: partial progress is
/// discarded rather than presenting a silently truncated data set.
pub fn load_records(
    paths: &[PathBuf],
    extractor: &dyn FieldExtractor,
) -> Result<(Vec<Record>, LoadSummary), LoadError> {
    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for path in paths {
        ingest_file(path, extractor, &mut records, &mut summary)?;
    }

    tracing::info!(
        "Loaded {} records from {} files ({} lines, {} skipped)",
        summary.records,
        summary.files,
        summary.lines,
        summary.skipped()
    );

    Ok((records, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::AnchorExtractor;
    use std::io::Write;

    fn write_log(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const SAMPLE: &str = "\
2024/01/15 10:30:00.123 Head: 1 Place     Bl:0 Ar:0 CadID:5 X1 PosX:12.3456 PosY:7.8901 TouchZ:0.1234
2024/01/15 10:31:00 Head: 2 Flux  Bl:0 Ar:0 CadID:5 X1 PosX:1.0000 PosY:2.0000 TouchZ:0.2000
machine idle
2024/01/15 10:32:00 Head: 3 Place Bl:0 Ar:0 CadID:5 X1 PosX:3.0000 PosY:4.0000 TouchZ:0.3456
";

    #[test]
    fn test_load_accumulates_place_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "a.log", SAMPLE);

        let extractor = AnchorExtractor::new();
        let (records, summary) = load_records(&[path], &extractor).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].head, 1);
        assert_eq!(records[1].head, 3);
        assert_eq!(summary.files, 1);
        assert_eq!(summary.lines, 4);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.not_matched, 1);
        assert_eq!(summary.filtered_out, 1);
        assert_eq!(summary.skipped(), 2);
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "a.log", SAMPLE);
        let extractor = AnchorExtractor::new();

        let (first, _) = load_records(std::slice::from_ref(&path), &extractor).unwrap();
        let (second, _) = load_records(std::slice::from_ref(&path), &extractor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_log(&dir, "a.log", SAMPLE);
        let missing = dir.path().join("nope.log");

        let extractor = AnchorExtractor::new();
        let err = load_records(&[good, missing], &extractor).unwrap_err();
        match err {
            LoadError::Open { path, .. } => assert!(path.ends_with("nope.log")),
            other => panic!("expected Open error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.log");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"2024/01/15 10:30:00 Head: 1 Place PosX:1.0 PosY:2.0 TouchZ:0.1234\n")
            .unwrap();
        file.write_all(&[0xff, 0xfe, 0xfd, b'\n']).unwrap();

        let extractor = AnchorExtractor::new();
        let err = load_records(&[path], &extractor).unwrap_err();
        match err {
            LoadError::Read { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "empty.log", "nothing relevant here\n");

        let extractor = AnchorExtractor::new();
        let (records, summary) = load_records(&[path], &extractor).unwrap();
        assert!(records.is_empty());
        assert_eq!(summary.files, 1);
    }
}
