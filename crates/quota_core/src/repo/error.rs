//! Repository error shared by template and day persistence.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surfaced by repositories and passed through the service unchanged.
#[derive(Debug)]
pub enum RepoError {
    /// Malformed template or missing completion evidence.
    Validation(ValidationError),
    /// Completion edits are rejected until the day is reopened.
    DayClosed(NaiveDate),
    /// No checklist line with this id exists for the day.
    ItemNotFound { day: NaiveDate, item_id: String },
    Db(DbError),
    /// Persisted row breaks a model invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DayClosed(day) => write!(f, "day {day} is closed; reopen it to edit"),
            Self::ItemNotFound { day, item_id } => {
                write!(f, "checklist item `{item_id}` not found for {day}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted quota data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DayClosed(_) => None,
            Self::ItemNotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
