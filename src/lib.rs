//! touchz - touch-height calibration log toolkit
//!
//! This library parses the touch-height calibration log lines produced by a
//! pick-and-place machine, filters them to `Place` measurements, and exposes
//! the result as a tabular export and a per-head scatter chart.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Per-line field extractors (anchor search and full pattern)
//! - [`record`] - Typed record schema and the field normalizer
//! - [`ingest`] - Batch file ingestion with per-line error recovery
//! - [`state`] - Session-owned record set, head colors and constants
//! - [`aggregate`] - Per-head time series grouping and bucket flooring
//! - [`export`] - CSV and tab-separated text export
//! - [`plot`] - Scatter chart rendering to PNG

pub mod aggregate;
pub mod export;
pub mod ingest;
pub mod parsers;
pub mod plot;
pub mod record;
pub mod state;
