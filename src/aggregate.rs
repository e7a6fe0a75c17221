//! Grouping of records into per-head time series.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};

use crate::record::Record;
use crate::state::head_color;

/// Time-ordered `(timestamp, touch_z)` points for one head, with its scatter
/// color. Derived on demand from a record set; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadSeries {
    pub head: u32,
    pub color: [u8; 3],
    pub points: Vec<(NaiveDateTime, f64)>,
}

/// Floor a timestamp to the start of its `bucket_hours`-wide bucket, counted
/// from midnight. `10:30` with 6-hour buckets floors to `06:00`.
pub fn floor_to_bucket(timestamp: NaiveDateTime, bucket_hours: u32) -> NaiveDateTime {
    if bucket_hours == 0 {
        return timestamp;
    }
    let hour = timestamp.hour() - timestamp.hour() % bucket_hours;
    timestamp
        .date()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or(timestamp)
}

/// Group records by head, each group sorted by timestamp ascending.
///
/// With `bucket_hours` set, timestamps are floored to that bucket width for
/// coarse time-axis grouping. Groups come out ordered by head number.
pub fn group_by_head(records: &[Record], bucket_hours: Option<u32>) -> Vec<HeadSeries> {
    let mut groups: BTreeMap<u32, Vec<(NaiveDateTime, f64)>> = BTreeMap::new();

    for record in records {
        let timestamp = match bucket_hours {
            Some(hours) => floor_to_bucket(record.timestamp, hours),
            None => record.timestamp,
        };
        groups
            .entry(record.head)
            .or_default()
            .push((timestamp, record.touch_z));
    }

    groups
        .into_iter()
        .map(|(head, mut points)| {
            points.sort_by_key(|&(timestamp, _)| timestamp);
            HeadSeries {
                head,
                color: head_color(head),
                points,
            }
        })
        .collect()
}
