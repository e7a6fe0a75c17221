//! Tabular export of the record set (CSV and tab-separated text).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::Record;

/// Failure while writing an export file, surfaced with the underlying cause.
#[derive(Debug, Error)]
#[error("Failed to write {path}: {source}")]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl ExportError {
    fn wrap(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
        |source| ExportError {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write records as CSV, in insertion order.
///
/// The extended columns are emitted only when at least one record carries
/// extended fields; records without them leave those cells empty.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(ExportError::wrap(path))?;
    let mut writer = BufWriter::new(file);
    csv_body(records, &mut writer).map_err(ExportError::wrap(path))
}

fn csv_body(records: &[Record], writer: &mut impl Write) -> std::io::Result<()> {
    let with_extended = records.iter().any(|r| r.extended.is_some());

    write!(writer, "DateTime,Head,DataType,PosX,PosY,TouchZ")?;
    if with_extended {
        write!(writer, ",Act(gf),Target(gf),Dbg,CValue,TouchTime1,TouchTime2")?;
    }
    writeln!(writer)?;

    for record in records {
        write!(
            writer,
            "{},{},{},{},{},{}",
            record.display_time(),
            record.head,
            record.category.as_ref(),
            record.pos_x,
            record.pos_y,
            record.touch_z
        )?;
        if with_extended {
            match &record.extended {
                Some(ext) => write!(
                    writer,
                    ",{},{},{},{},{},{}",
                    ext.act_gf, ext.target_gf, ext.dbg, ext.c_value, ext.touch_time1,
                    ext.touch_time2
                )?,
                None => write!(writer, ",,,,,,")?,
            }
        }
        writeln!(writer)?;
    }

    writer.flush()
}

/// Write records as a pretty-printed JSON array.
pub fn write_json(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(ExportError::wrap(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(std::io::Error::other)
        .and_then(|()| writer.flush())
        .map_err(ExportError::wrap(path))
}

/// Write records as tab-separated `key: value` pairs, one record per line.
pub fn write_text(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(ExportError::wrap(path))?;
    let mut writer = BufWriter::new(file);
    text_body(records, &mut writer).map_err(ExportError::wrap(path))
}

fn text_body(records: &[Record], writer: &mut impl Write) -> std::io::Result<()> {
    for record in records {
        writeln!(
            writer,
            "DateTime: {}\tHead: {}\tDataType: {}\tPosX: {}\tPosY: {}\tTouchZ: {}",
            record.display_time(),
            record.head,
            record.category.as_ref(),
            record.pos_x,
            record.pos_y,
            record.touch_z
        )?;
    }
    writer.flush()
}
