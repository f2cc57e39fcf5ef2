//! Domain model for the daily quota checklist.
//!
//! # Responsibility
//! - Define the template schema users edit and its validation rules.
//! - Define per-day snapshot records and their storage codecs.
//!
//! # Invariants
//! - One template exists per database; days snapshot it at instantiation.
//! - `checked=true` always carries trimmed, non-empty evidence.

pub mod day;
pub mod template;
pub mod validation;
