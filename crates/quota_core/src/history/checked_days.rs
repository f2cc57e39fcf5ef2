//! Checked-day range query.
//!
//! # Invariants
//! - Range bounds are inclusive on both ends.
//! - Result has set semantics; a reversed range is empty.

use crate::model::day::{format_day, parse_day};
use crate::repo::error::{RepoError, RepoResult};
use chrono::{Datelike, Months, NaiveDate};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

/// Returns the distinct days in `[start, end]` having a checked item.
pub fn checked_days(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<BTreeSet<NaiveDate>> {
    if end < start {
        return Ok(BTreeSet::new());
    }

    // ISO day keys sort lexicographically in calendar order.
    let mut stmt = conn.prepare(
        "SELECT DISTINCT day
         FROM day_item
         WHERE checked = 1
           AND day BETWEEN ?1 AND ?2;",
    )?;
    let mut rows = stmt.query(params![format_day(start), format_day(end)])?;
    let mut days = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let text: String = row.get(0)?;
        let day = parse_day(&text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid day value `{text}` in day_item.day"))
        })?;
        days.insert(day);
    }

    Ok(days)
}

/// Inclusive first and last day of the calendar month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}
