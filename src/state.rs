//! Session state and constants.
//!
//! The record set is owned by a [`Session`] and replaced wholesale on every
//! load; export and plot consumers borrow it explicitly instead of reading
//! ambient state.

use std::path::PathBuf;

use crate::ingest::{load_records, LoadError, LoadSummary};
use crate::parsers::FieldExtractor;
use crate::record::Record;

// ============================================================================
// Constants
// ============================================================================

/// Bucket width used when flooring timestamps for coarse time grouping
pub const BUCKET_HOURS: u32 = 6;

/// Supported log file extensions (used in CLI help and docs)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["log", "txt"];

/// Fixed scatter colors for the machine's four physical heads
pub const HEAD_COLORS: &[[u8; 3]] = &[
    [224, 49, 49],  // Head 1: red
    [255, 146, 43], // Head 2: orange
    [66, 99, 235],  // Head 3: blue
    [45, 159, 78],  // Head 4: green
];

/// Deterministic fallback palette for head numbers outside 1-4
pub const FALLBACK_COLORS: &[[u8; 3]] = &[
    [148, 86, 211],  // Purple
    [0, 158, 115],   // Bluish green
    [204, 121, 167], // Reddish purple
    [253, 193, 73],  // Amber
    [100, 149, 237], // Cornflower blue
    [153, 153, 153], // Gray
];

/// Scatter color for a head. Heads 1-4 use the fixed assignment; any other
/// head gets a stable fallback color instead of panicking.
pub fn head_color(head: u32) -> [u8; 3] {
    match head {
        1..=4 => HEAD_COLORS[(head - 1) as usize],
        other => FALLBACK_COLORS[other as usize % FALLBACK_COLORS.len()],
    }
}

// ============================================================================
// Session
// ============================================================================

/// Exclusive owner of the current record set.
#[derive(Default)]
pub struct Session {
    records: Vec<Record>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a set of log files, replacing any previously held records.
    ///
    /// All-or-nothing: on a file-level failure the previous record set is
    /// kept untouched and the error is returned.
    pub fn load(
        &mut self,
        paths: &[PathBuf],
        extractor: &dyn FieldExtractor,
    ) -> Result<LoadSummary, LoadError> {
        let (records, summary) = load_records(paths, extractor)?;
        self.records = records;
        Ok(summary)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
