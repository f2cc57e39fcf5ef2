//! Day checklist repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Instantiate a day's checklist snapshot from the current template.
//! - Persist completion state and the per-day close flag.
//!
//! # Invariants
//! - A day is instantiated at most once; later template edits never touch it.
//! - Duplicate `(day, item_id)` inserts are ignored, first write wins.
//! - Completion edits on a closed day are rejected inside the same
//!   transaction that would apply them.
//! - Item listing order is `item_id ASC`.

use crate::db::migrations::apply_migrations;
use crate::expand::flatten::flatten;
use crate::history::checked_days::checked_days;
use crate::model::day::{
    format_day, now_timestamp, parse_day, parse_timestamp, DayItem, DayStatus,
};
use crate::model::validation::ValidationError;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::template_repo::{SqliteTemplateRepository, TemplateStore};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

const DAY_ITEM_SELECT_SQL: &str = "SELECT
    day,
    item_id,
    item_text,
    importance,
    checked,
    evidence,
    why,
    checked_at
FROM day_item";

/// Repository interface for per-day checklist state.
pub trait DayRepository {
    /// Ensures the backing schema exists.
    fn init_schema(&self) -> RepoResult<()>;
    /// Snapshots the current template into `day` unless rows already exist.
    fn instantiate_if_needed(&self, day: NaiveDate) -> RepoResult<()>;
    /// Instantiates `day` if needed and returns its items by `item_id`.
    fn get_items(&self, day: NaiveDate) -> RepoResult<Vec<DayItem>>;
    /// Sets completion state for one item.
    ///
    /// # Errors
    /// - `Validation(EvidenceRequired)` when checking with blank evidence.
    /// - `DayClosed` when the day is closed.
    /// - `ItemNotFound` when the day has no such item.
    fn set_checked(
        &self,
        day: NaiveDate,
        item_id: &str,
        checked: bool,
        evidence: &str,
        why: &str,
    ) -> RepoResult<()>;
    /// Returns the stored status, or the implicit open status.
    fn get_status(&self, day: NaiveDate) -> RepoResult<DayStatus>;
    /// Upserts the close flag, stamping or clearing `closed_at`.
    fn set_closed(&self, day: NaiveDate, closed: bool) -> RepoResult<()>;
    /// Days in `[start, end]` with at least one checked item.
    fn checked_days(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<BTreeSet<NaiveDate>>;

    fn is_closed(&self, day: NaiveDate) -> RepoResult<bool> {
        Ok(self.get_status(day)?.closed)
    }
}

/// SQLite-backed day repository.
///
/// Reads the template through its own [`SqliteTemplateRepository`] on the
/// same connection, so instantiation sees the template committed at that
/// moment.
pub struct SqliteDayRepository<'conn> {
    conn: &'conn Connection,
    templates: SqliteTemplateRepository<'conn>,
}

impl<'conn> SqliteDayRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            templates: SqliteTemplateRepository::new(conn),
        }
    }
}

impl DayRepository for SqliteDayRepository<'_> {
    fn init_schema(&self) -> RepoResult<()> {
        apply_migrations(self.conn)?;
        Ok(())
    }

    fn instantiate_if_needed(&self, day: NaiveDate) -> RepoResult<()> {
        let day_key = format_day(day);
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM day_item WHERE day = ?1;",
            [day_key.as_str()],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(());
        }

        let template = self.templates.load()?;
        let lines = flatten(&template);
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO day_item (
                    day,
                    item_id,
                    item_text,
                    importance,
                    checked,
                    evidence,
                    why,
                    checked_at
                ) VALUES (?1, ?2, ?3, ?4, 0, '', '', NULL);",
            )?;
            for line in &lines {
                inserted += stmt.execute(params![
                    day_key.as_str(),
                    line.item_id.as_str(),
                    line.item_text.as_str(),
                    line.importance,
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=day_instantiate module=repo status=ok day={} line_count={} inserted={}",
            day_key,
            lines.len(),
            inserted
        );
        Ok(())
    }

    fn get_items(&self, day: NaiveDate) -> RepoResult<Vec<DayItem>> {
        self.instantiate_if_needed(day)?;

        let mut stmt = self.conn.prepare(&format!(
            "{DAY_ITEM_SELECT_SQL}
             WHERE day = ?1
             ORDER BY item_id ASC;"
        ))?;
        let mut rows = stmt.query([format_day(day)])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_day_item_row(row)?);
        }

        Ok(items)
    }

    fn set_checked(
        &self,
        day: NaiveDate,
        item_id: &str,
        checked: bool,
        evidence: &str,
        why: &str,
    ) -> RepoResult<()> {
        let evidence = evidence.trim();
        let why = why.trim();
        if checked && evidence.is_empty() {
            return Err(ValidationError::EvidenceRequired.into());
        }

        let day_key = format_day(day);
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if load_status(&tx, day)?.closed {
            debug!("event=item_mark module=repo status=rejected day={day_key} error_code=day_closed");
            return Err(RepoError::DayClosed(day));
        }

        let checked_at = checked.then(now_timestamp);
        let changed = tx.execute(
            "UPDATE day_item
             SET
                checked = ?1,
                evidence = ?2,
                why = ?3,
                checked_at = ?4
             WHERE day = ?5
               AND item_id = ?6;",
            params![
                bool_to_int(checked),
                evidence,
                why,
                checked_at,
                day_key.as_str(),
                item_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound {
                day,
                item_id: item_id.to_string(),
            });
        }
        tx.commit()?;

        info!(
            "event=item_mark module=repo status=ok day={} checked={} evidence_chars={}",
            day_key,
            checked,
            evidence.chars().count()
        );
        Ok(())
    }

    fn get_status(&self, day: NaiveDate) -> RepoResult<DayStatus> {
        load_status(self.conn, day)
    }

    fn set_closed(&self, day: NaiveDate, closed: bool) -> RepoResult<()> {
        let day_key = format_day(day);
        if closed {
            self.conn.execute(
                "INSERT INTO day_status (day, closed, closed_at) VALUES (?1, 1, ?2)
                 ON CONFLICT(day) DO UPDATE SET closed = 1, closed_at = excluded.closed_at;",
                params![day_key.as_str(), now_timestamp()],
            )?;
        } else {
            self.conn.execute(
                "INSERT INTO day_status (day, closed, closed_at) VALUES (?1, 0, NULL)
                 ON CONFLICT(day) DO UPDATE SET closed = 0, closed_at = NULL;",
                [day_key.as_str()],
            )?;
        }

        info!(
            "event={} module=repo status=ok day={day_key}",
            status_event(closed)
        );
        Ok(())
    }

    fn checked_days(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<BTreeSet<NaiveDate>> {
        checked_days(self.conn, start, end)
    }
}

fn load_status(conn: &Connection, day: NaiveDate) -> RepoResult<DayStatus> {
    let day_key = format_day(day);
    let stored: Option<(i64, Option<String>)> = conn
        .query_row(
            "SELECT closed, closed_at FROM day_status WHERE day = ?1;",
            [day_key.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((closed_value, closed_at_text)) = stored else {
        return Ok(DayStatus::open(day));
    };

    let closed = parse_flag(closed_value, "day_status.closed")?;
    let closed_at = parse_optional_timestamp(closed_at_text, "day_status.closed_at")?;
    if closed != closed_at.is_some() {
        return Err(RepoError::InvalidData(format!(
            "day_status for {day_key} has closed={closed} but closed_at={closed_at:?}"
        )));
    }

    Ok(DayStatus {
        day,
        closed,
        closed_at,
    })
}

fn parse_day_item_row(row: &Row<'_>) -> RepoResult<DayItem> {
    let day_text: String = row.get("day")?;
    let day = parse_day(&day_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid day value `{day_text}` in day_item.day"))
    })?;

    let importance = row.get::<_, i64>("importance")?;
    let importance = u32::try_from(importance).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid importance `{importance}` in day_item.importance"
        ))
    })?;

    let item = DayItem {
        day,
        item_id: row.get("item_id")?,
        item_text: row.get("item_text")?,
        importance,
        checked: parse_flag(row.get("checked")?, "day_item.checked")?,
        evidence: row.get::<_, Option<String>>("evidence")?.unwrap_or_default(),
        why: row.get::<_, Option<String>>("why")?.unwrap_or_default(),
        checked_at: parse_optional_timestamp(row.get("checked_at")?, "day_item.checked_at")?,
    };

    if !item.is_consistent() {
        return Err(RepoError::InvalidData(format!(
            "day_item `{}` on {day_text} breaks the completion invariant",
            item.item_id
        )));
    }
    Ok(item)
}

fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn parse_optional_timestamp(
    value: Option<String>,
    column: &str,
) -> RepoResult<Option<NaiveDateTime>> {
    match value {
        Some(text) => parse_timestamp(&text).map(Some).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid timestamp `{text}` in {column}"))
        }),
        None => Ok(None),
    }
}

fn status_event(closed: bool) -> &'static str {
    if closed {
        "day_close"
    } else {
        "day_reopen"
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_flag, status_event};

    #[test]
    fn close_and_reopen_log_distinct_events() {
        assert_eq!(status_event(true), "day_close");
        assert_eq!(status_event(false), "day_reopen");
    }

    #[test]
    fn parse_flag_rejects_values_outside_zero_and_one() {
        assert!(!parse_flag(0, "checked").unwrap());
        assert!(parse_flag(1, "checked").unwrap());
        assert!(parse_flag(2, "checked").is_err());
    }
}
