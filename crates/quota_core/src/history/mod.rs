//! Completion history queries for calendar activity markers.
//!
//! # Responsibility
//! - Answer "which days in this window have any completed item".
//! - Compute the month window a calendar view asks about.

pub mod checked_days;
