//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for template and days.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Template writes must pass `Template::validate()` before persistence.
//! - Repository APIs return semantic errors (`DayClosed`, `ItemNotFound`) in
//!   addition to DB transport errors.

pub mod day_repo;
pub mod error;
pub mod template_repo;
