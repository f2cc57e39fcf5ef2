//! Depth-one template flattening.
//!
//! # Invariants
//! - Top-level items keep template order; each item's sub-items follow it
//!   immediately, in their own order.
//! - Sub-item ids are `"<parent_id>:<sub_id>"`.
//! - Sub-items without an importance inherit the parent's.

use crate::model::template::Template;

/// Separator between parent and sub-item ids in flattened `item_id`s.
pub const SUBITEM_ID_SEPARATOR: char = ':';

/// One concrete checklist line derived from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatChecklistLine {
    pub item_id: String,
    pub item_text: String,
    pub importance: u32,
}

/// Expands `template` into its ordered checklist lines.
pub fn flatten(template: &Template) -> Vec<FlatChecklistLine> {
    let capacity = template
        .items
        .iter()
        .map(|item| 1 + item.subitems.len())
        .sum();
    let mut lines = Vec::with_capacity(capacity);

    for item in &template.items {
        lines.push(FlatChecklistLine {
            item_id: item.id.clone(),
            item_text: item.text.clone(),
            importance: item.importance,
        });
        for sub in &item.subitems {
            lines.push(FlatChecklistLine {
                item_id: format!("{}{SUBITEM_ID_SEPARATOR}{}", item.id, sub.id),
                item_text: sub.text.clone(),
                importance: sub.importance.unwrap_or(item.importance),
            });
        }
    }

    lines
}
