//! Per-day checklist snapshot records.
//!
//! # Responsibility
//! - Define the persisted day item and day status shapes.
//! - Own the text codecs used for `day`, `checked_at` and `closed_at`.
//!
//! # Invariants
//! - `checked=true` implies trimmed non-empty evidence and `checked_at` set.
//! - `checked=false` implies `checked_at` is `None`.
//! - `closed=true` iff `closed_at` is set.

use chrono::{Local, NaiveDate, NaiveDateTime};

const DAY_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One checklist line instantiated into a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayItem {
    pub day: NaiveDate,
    /// Template id, `parent:sub` for sub-items.
    pub item_id: String,
    pub item_text: String,
    pub importance: u32,
    pub checked: bool,
    /// Proof of completion. Empty while unchecked unless the caller kept it.
    pub evidence: String,
    /// Optional motivation note.
    pub why: String,
    /// Local wall-clock second at which the item was checked.
    pub checked_at: Option<NaiveDateTime>,
}

impl DayItem {
    /// Returns whether this row satisfies the completion invariant.
    pub fn is_consistent(&self) -> bool {
        if self.checked {
            !self.evidence.trim().is_empty() && self.checked_at.is_some()
        } else {
            self.checked_at.is_none()
        }
    }
}

/// Close flag for one calendar day. A missing row reads as open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStatus {
    pub day: NaiveDate,
    pub closed: bool,
    pub closed_at: Option<NaiveDateTime>,
}

impl DayStatus {
    /// Status implied by an absent `day_status` row.
    pub fn open(day: NaiveDate) -> Self {
        Self {
            day,
            closed: false,
            closed_at: None,
        }
    }
}

/// Snapshot returned to callers after every read or mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayState {
    pub day: NaiveDate,
    /// Ordered by `item_id`.
    pub items: Vec<DayItem>,
    pub closed: bool,
    pub closed_at: Option<NaiveDateTime>,
}

impl DayState {
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|item| item.checked).count()
    }

    pub fn find_item(&self, item_id: &str) -> Option<&DayItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }
}

/// Formats a day as the ISO-8601 key stored in `day` columns.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses an ISO-8601 `YYYY-MM-DD` day key.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok()
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Current local time at whole-second precision, as stored.
pub fn now_timestamp() -> String {
    Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
}
