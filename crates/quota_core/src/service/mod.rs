//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the quota use-case API.
//! - Keep presentation layers decoupled from storage details.

pub mod quota_service;
