//! Template expansion into concrete checklist lines.
//!
//! # Responsibility
//! - Turn the nested template into the flat list a day is instantiated from.
//!
//! # Invariants
//! - Expansion is pure and deterministic given template order.

pub mod flatten;
