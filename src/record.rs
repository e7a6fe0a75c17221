//! Record normalization: raw field substrings to typed calibration records.

use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use strum::{AsRefStr, EnumString};

use crate::parsers::RawFields;

/// Expected timestamp layout; the fractional part is optional on input and
/// always discarded in the normalized record.
pub const TIME_LAYOUT: &str = "%Y/%m/%d %H:%M:%S%.f";

/// Timestamp layout used for display and export (whole seconds).
pub const TIME_DISPLAY_LAYOUT: &str = "%Y/%m/%d %H:%M:%S";

/// Operation category logged on a line
#[derive(AsRefStr, Clone, Copy, Debug, EnumString, PartialEq, Eq, Serialize)]
pub enum Category {
    Place,
    Flux,
    Pick,
}

/// Extra measurements carried by the richer log variant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtendedFields {
    pub act_gf: f64,
    pub target_gf: f64,
    pub dbg: String,
    pub c_value: String,
    pub touch_time1: u32,
    pub touch_time2: u32,
}

/// One normalized touch-height measurement.
///
/// A record only exists for `Place` lines with a complete timestamp, a
/// positive head and parseable coordinates; everything else is rejected
/// before entering the record set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub head: u32,
    pub category: Category,
    pub pos_x: f64,
    pub pos_y: f64,
    pub touch_z: f64,
    pub extended: Option<ExtendedFields>,
}

impl Record {
    /// Timestamp formatted for export and display, without fractional seconds
    pub fn display_time(&self) -> String {
        self.timestamp.format(TIME_DISPLAY_LAYOUT).to_string()
    }
}

/// Why a line's fields did not become a record.
///
/// All of these are expected, silent outcomes: `FilteredOut` marks a valid
/// line of a category other than `Place`, the rest mark malformed fields.
/// None of them aborts a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejected {
    BadTimestamp,
    BadHead,
    FilteredOut,
    BadNumber,
}

fn parse_float(value: Option<&str>) -> Result<f64, Rejected> {
    value
        .ok_or(Rejected::BadNumber)?
        .trim()
        .parse()
        .map_err(|_| Rejected::BadNumber)
}

/// Coerce extracted fields into a typed record, applying the category filter.
///
/// Pure function: no side effects, each step independently failable.
pub fn normalize(fields: &RawFields) -> Result<Record, Rejected> {
    let time = fields.time.as_deref().ok_or(Rejected::BadTimestamp)?;
    let timestamp = NaiveDateTime::parse_from_str(time.trim(), TIME_LAYOUT)
        .map_err(|_| Rejected::BadTimestamp)?;
    // Milliseconds are never retained downstream.
    let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);

    let head: u32 = fields
        .head
        .as_deref()
        .ok_or(Rejected::BadHead)?
        .trim()
        .parse()
        .map_err(|_| Rejected::BadHead)?;
    if head == 0 {
        return Err(Rejected::BadHead);
    }

    let category = fields.category.as_deref().ok_or(Rejected::FilteredOut)?;
    let category = Category::from_str(category.trim()).map_err(|_| Rejected::FilteredOut)?;
    if category != Category::Place {
        return Err(Rejected::FilteredOut);
    }

    let pos_x = parse_float(fields.pos_x.as_deref())?;
    let pos_y = parse_float(fields.pos_y.as_deref())?;
    let touch_z = parse_float(fields.touch_z.as_deref())?;

    let extended = if fields.act_gf.is_some() {
        Some(ExtendedFields {
            act_gf: parse_float(fields.act_gf.as_deref())?,
            target_gf: parse_float(fields.target_gf.as_deref())?,
            dbg: fields.dbg.clone().unwrap_or_default(),
            c_value: fields.c_value.clone().unwrap_or_default(),
            touch_time1: parse_touch_time(fields.touch_time1.as_deref())?,
            touch_time2: parse_touch_time(fields.touch_time2.as_deref())?,
        })
    } else {
        None
    };

    Ok(Record {
        timestamp,
        head,
        category,
        pos_x,
        pos_y,
        touch_z,
        extended,
    })
}

fn parse_touch_time(value: Option<&str>) -> Result<u32, Rejected> {
    value
        .ok_or(Rejected::BadNumber)?
        .trim()
        .parse()
        .map_err(|_| Rejected::BadNumber)
}
