//! Validation failures raised before anything is persisted.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected by template or completion validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Editor text is not parseable JSON.
    InvalidJson(String),
    /// Template root must be a JSON list.
    NotAList,
    /// One list element does not match the item schema.
    MalformedItem { index: usize, message: String },
    /// `id` or `text` is blank after trimming.
    EmptyField {
        item_id: String,
        field: &'static str,
    },
    /// Importance must be at least 1.
    InvalidImportance { item_id: String, importance: u32 },
    /// Two template entries flatten to the same checklist id.
    DuplicateItemId(String),
    /// Checking an item requires non-blank evidence.
    EvidenceRequired,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(message) => write!(f, "template is not valid JSON: {message}"),
            Self::NotAList => write!(f, "template must be a list"),
            Self::MalformedItem { index, message } => {
                write!(f, "template item #{index} is malformed: {message}")
            }
            Self::EmptyField { item_id, field } => {
                write!(f, "template item `{item_id}` has an empty `{field}`")
            }
            Self::InvalidImportance {
                item_id,
                importance,
            } => write!(
                f,
                "template item `{item_id}` has importance {importance}; expected >= 1"
            ),
            Self::DuplicateItemId(item_id) => {
                write!(f, "template expands to duplicate item id `{item_id}`")
            }
            Self::EvidenceRequired => write!(f, "evidence is required to check an item"),
        }
    }
}

impl Error for ValidationError {}
