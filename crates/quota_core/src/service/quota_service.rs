//! Quota use-case service.
//!
//! # Responsibility
//! - Provide the full operation surface consumed by presentation layers.
//! - Drive the per-day lifecycle: none -> open -> closed -> open.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or the closed-day check.
//! - Repository errors are returned unchanged.
//! - Template changes only affect days instantiated afterwards.
//! - Callers re-read state after every mutation; the service keeps none.

use crate::history::checked_days::month_bounds;
use crate::model::day::DayState;
use crate::model::template::Template;
use crate::repo::day_repo::{DayRepository, SqliteDayRepository};
use crate::repo::error::RepoResult;
use crate::repo::template_repo::{SqliteTemplateRepository, TemplateStore};
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;
use serde_json::Value;
use std::collections::BTreeSet;

/// Use-case service over template and day repositories.
pub struct QuotaService<T: TemplateStore, D: DayRepository> {
    templates: T,
    days: D,
}

/// Service wired to SQLite repositories sharing one connection.
pub type SqliteQuotaService<'conn> =
    QuotaService<SqliteTemplateRepository<'conn>, SqliteDayRepository<'conn>>;

impl<'conn> SqliteQuotaService<'conn> {
    /// Builds both SQLite repositories over `conn`.
    pub fn from_connection(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteTemplateRepository::new(conn),
            SqliteDayRepository::new(conn),
        )
    }
}

impl<T: TemplateStore, D: DayRepository> QuotaService<T, D> {
    /// Creates a service using the provided repository implementations.
    pub fn new(templates: T, days: D) -> Self {
        Self { templates, days }
    }

    /// Idempotent startup: schema, then the default template if none exists.
    ///
    /// Safe to call on every process start.
    pub fn initialize(&self) -> RepoResult<()> {
        self.templates.init_schema()?;
        self.templates.ensure_default()?;
        self.days.init_schema()?;
        info!("event=quota_init module=service status=ok");
        Ok(())
    }

    /// Returns the day's items (instantiating on first access) and close state.
    pub fn get_day(&self, day: NaiveDate) -> RepoResult<DayState> {
        let items = self.days.get_items(day)?;
        let status = self.days.get_status(day)?;
        Ok(DayState {
            day,
            items,
            closed: status.closed,
            closed_at: status.closed_at,
        })
    }

    /// Checks or unchecks one item.
    ///
    /// # Errors
    /// - `Validation(EvidenceRequired)`, `DayClosed` or `ItemNotFound`, as
    ///   raised by [`DayRepository::set_checked`].
    pub fn mark_item(
        &self,
        day: NaiveDate,
        item_id: &str,
        checked: bool,
        evidence: &str,
        why: &str,
    ) -> RepoResult<()> {
        self.days.set_checked(day, item_id, checked, evidence, why)
    }

    /// Freezes the day against completion edits. Unchecked items are allowed.
    pub fn close_day(&self, day: NaiveDate) -> RepoResult<()> {
        self.days.set_closed(day, true)
    }

    /// Reopens a closed day. No-op state-wise for an open day.
    pub fn reopen_day(&self, day: NaiveDate) -> RepoResult<()> {
        self.days.set_closed(day, false)
    }

    /// Days in the inclusive range that have any checked item.
    pub fn get_checked_days(
        &self,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> RepoResult<BTreeSet<NaiveDate>> {
        self.days.checked_days(month_start, month_end)
    }

    /// Checked days within the calendar month containing `day`.
    pub fn get_checked_days_in_month(&self, day: NaiveDate) -> RepoResult<BTreeSet<NaiveDate>> {
        let (month_start, month_end) = month_bounds(day);
        self.get_checked_days(month_start, month_end)
    }

    pub fn load_template(&self) -> RepoResult<Template> {
        self.templates.load()
    }

    pub fn save_template(&self, template: &Template) -> RepoResult<()> {
        self.templates.save(template)
    }

    /// Saves untyped editor JSON and returns the normalized template.
    pub fn save_template_json(&self, value: Value) -> RepoResult<Template> {
        self.templates.save_json(value)
    }

    /// Overwrites the stored template with the built-in default.
    pub fn reset_template(&self) -> RepoResult<Template> {
        let template = Template::builtin_default();
        self.templates.save(&template)?;
        info!("event=template_reset module=service status=ok");
        Ok(template)
    }
}
