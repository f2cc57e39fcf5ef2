//! Core domain logic for the daily quota tracker.
//! This crate is the single source of truth for checklist invariants.

pub mod db;
pub mod expand;
pub mod history;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use expand::flatten::{flatten, FlatChecklistLine};
pub use history::checked_days::{checked_days, month_bounds};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::day::{DayItem, DayState, DayStatus};
pub use model::template::{Template, TemplateItem, TemplateSubItem};
pub use model::validation::ValidationError;
pub use repo::day_repo::{DayRepository, SqliteDayRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateStore};
pub use service::quota_service::{QuotaService, SqliteQuotaService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
