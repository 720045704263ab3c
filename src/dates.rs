//! Date normalization for feed entries.
//!
//! Feed dates arrive as parser-produced instants, 9-component time structs,
//! free text, or not at all. Normalization never fails: anything that is
//! not a usable date resolves to the current local time.

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};

use crate::feed::{FeedEntry, FieldValue};

/// Fields consulted, in order, when ordering entries by date.
const ORDERING_FIELDS: [&str; 5] = [
    "updated_parsed",
    "published_parsed",
    "date_parsed",
    "updated",
    "published",
];

/// Gap assigned between consecutive undated entries so they keep feed order.
const UNDATED_STEP_SECS: i64 = 30;

/// Normalizes the date stored under `field_name`.
///
/// Returns the current local time when the field is missing or holds
/// anything other than a parsed instant or a time struct with at least six
/// valid integer components. Time structs are taken as-is, without any
/// timezone adjustment.
pub fn date_to_datetime(field_name: &str, entry: &FeedEntry) -> NaiveDateTime {
    match entry.get(field_name).and_then(as_timestamp) {
        Some(date) => date,
        None => {
            tracing::trace!(field = field_name, "No usable date, falling back to now");
            now()
        }
    }
}

/// A date normalizer bound to one field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    name: String,
}

impl DateField {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn normalize(&self, entry: &FeedEntry) -> NaiveDateTime {
        date_to_datetime(&self.name, entry)
    }
}

/// Orders entries newest first and keeps at most `limit` of them.
///
/// An entry's date is the first usable value among `updated_parsed`,
/// `published_parsed`, `date_parsed`, `updated` and `published`. Undated entries are placed 30
/// seconds apart going back from now, in feed order.
pub fn entries_by_date(entries: Vec<FeedEntry>, limit: Option<usize>) -> Vec<FeedEntry> {
    let now = now();
    let mut dated: Vec<(NaiveDateTime, FeedEntry)> = entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let date = ORDERING_FIELDS
                .iter()
                .find_map(|field| entry.get(field).and_then(as_timestamp))
                .unwrap_or_else(|| undated_date(now, position));
            (date, entry)
        })
        .collect();

    dated.sort_by(|a, b| b.0.cmp(&a.0));

    dated
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(_, entry)| entry)
        .collect()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn undated_date(now: NaiveDateTime, position: usize) -> NaiveDateTime {
    let secs = i64::try_from(position)
        .unwrap_or(i64::MAX)
        .saturating_mul(UNDATED_STEP_SECS);
    TimeDelta::try_seconds(secs)
        .and_then(|offset| now.checked_sub_signed(offset))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Interprets a field value as a point in time, if it is date-like.
fn as_timestamp(value: &FieldValue) -> Option<NaiveDateTime> {
    match value {
        FieldValue::DateTime(instant) => Some(instant.naive_utc()),
        FieldValue::List(parts) => from_time_struct(parts),
        _ => None,
    }
}

/// Builds a timestamp from (year, month, day, hour, minute, second, ...).
fn from_time_struct(parts: &[FieldValue]) -> Option<NaiveDateTime> {
    if parts.len() < 6 {
        return None;
    }

    let mut components = [0i64; 6];
    for (slot, part) in components.iter_mut().zip(parts) {
        *slot = part.as_integer()?;
    }
    let [year, month, day, hour, minute, second] = components;

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?;
    date.and_hms_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
    )
}
