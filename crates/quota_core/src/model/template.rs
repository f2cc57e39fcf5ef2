//! Checklist template schema.
//!
//! # Responsibility
//! - Define the strict JSON schema for the user-editable template.
//! - Fill optional fields with defaults and validate before persistence.
//!
//! # Invariants
//! - Every item and sub-item has a non-blank `id` and `text`.
//! - Top-level `importance` defaults to 1; sub-item `importance` stays unset
//!   so it keeps inheriting the parent's value.
//! - Flattened item ids are unique within one template.

use crate::expand::flatten::flatten;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

const DEFAULT_IMPORTANCE: u32 = 1;

/// Ordered list of checklist definitions; serialized as a bare JSON list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    pub items: Vec<TemplateItem>,
}

/// One top-level checklist definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub id: String,
    pub text: String,
    #[serde(default = "default_importance")]
    pub importance: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subitems: Vec<TemplateSubItem>,
}

/// Nested checklist definition, expanded one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSubItem {
    pub id: String,
    pub text: String,
    /// `None` inherits the parent's importance at flatten time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<u32>,
}

fn default_importance() -> u32 {
    DEFAULT_IMPORTANCE
}

/// Editors may write `"subitems": null` for an item without children.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TemplateSubItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TemplateSubItem>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TemplateItem {
    /// Creates an item with default importance and no sub-items.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            importance: DEFAULT_IMPORTANCE,
            subitems: Vec::new(),
        }
    }

    pub fn with_importance(mut self, importance: u32) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_subitem(mut self, subitem: TemplateSubItem) -> Self {
        self.subitems.push(subitem);
        self
    }
}

impl TemplateSubItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            importance: None,
        }
    }
}

impl Template {
    pub fn new(items: Vec<TemplateItem>) -> Self {
        Self { items }
    }

    /// Built-in template used on first start, on reset and as the fallback
    /// for unreadable stored data.
    pub fn builtin_default() -> Self {
        Self::new(vec![
            TemplateItem::new("progress", "Progress: move a project forward").with_importance(3),
            TemplateItem::new("care", "Care/Connection: serve or connect").with_importance(2),
            TemplateItem::new("maintenance", "Maintenance: body / admin / environment")
                .with_importance(2),
        ])
    }

    /// Parses template editor text.
    ///
    /// # Errors
    /// - `InvalidJson` when the text is not JSON at all.
    /// - Any error from [`Template::from_json_value`].
    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| ValidationError::InvalidJson(err.to_string()))?;
        Self::from_json_value(value)
    }

    /// Converts untyped JSON into a validated template, filling defaults.
    ///
    /// The root must be a list and every element an object with string `id`
    /// and `text`. Unknown keys are ignored.
    pub fn from_json_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Array(elements) = value else {
            return Err(ValidationError::NotAList);
        };

        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            if !element.is_object() {
                return Err(ValidationError::MalformedItem {
                    index,
                    message: "expected an object with `id` and `text`".to_string(),
                });
            }
            let item: TemplateItem = serde_json::from_value(element).map_err(|err| {
                ValidationError::MalformedItem {
                    index,
                    message: err.to_string(),
                }
            })?;
            items.push(item);
        }

        let template = Self::new(items);
        template.validate()?;
        Ok(template)
    }

    /// Serializes to the compact JSON text stored in `template.data`.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty JSON for template editors.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Checks declaration-level template invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (index, item) in self.items.iter().enumerate() {
            let label = if item.id.trim().is_empty() {
                format!("#{index}")
            } else {
                item.id.clone()
            };
            require_text(&item.id, &label, "id")?;
            require_text(&item.text, &label, "text")?;
            require_importance(item.importance, &label)?;

            for sub in &item.subitems {
                let sub_label = format!("{label}:{}", sub.id);
                require_text(&sub.id, &sub_label, "id")?;
                require_text(&sub.text, &sub_label, "text")?;
                if let Some(importance) = sub.importance {
                    require_importance(importance, &sub_label)?;
                }
            }
        }

        let mut seen = HashSet::new();
        for line in flatten(self) {
            if !seen.insert(line.item_id.clone()) {
                return Err(ValidationError::DuplicateItemId(line.item_id));
            }
        }

        Ok(())
    }
}

fn require_text(value: &str, item_id: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            item_id: item_id.to_string(),
            field,
        });
    }
    Ok(())
}

fn require_importance(importance: u32, item_id: &str) -> Result<(), ValidationError> {
    if importance < 1 {
        return Err(ValidationError::InvalidImportance {
            item_id: item_id.to_string(),
            importance,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Template, TemplateItem, TemplateSubItem};
    use crate::model::validation::ValidationError;
    use serde_json::json;

    #[test]
    fn builtin_default_has_three_weighted_items() {
        let template = Template::builtin_default();
        let ids: Vec<&str> = template.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["progress", "care", "maintenance"]);
        assert_eq!(template.items[0].importance, 3);
        assert!(template.items.iter().all(|item| item.subitems.is_empty()));
        template.validate().expect("default template must be valid");
    }

    #[test]
    fn from_json_value_fills_missing_defaults() {
        let template = Template::from_json_value(json!([
            {"id": "a", "text": "A", "subitems": [{"id": "1", "text": "A1"}]}
        ]))
        .expect("template should parse");

        assert_eq!(template.items[0].importance, 1);
        assert_eq!(template.items[0].subitems[0].importance, None);
    }

    #[test]
    fn from_json_value_treats_null_subitems_as_empty() {
        let template =
            Template::from_json_value(json!([{"id": "a", "text": "A", "subitems": null}]))
                .expect("null subitems should parse");
        assert!(template.items[0].subitems.is_empty());
    }

    #[test]
    fn from_json_value_rejects_non_list_root() {
        let err = Template::from_json_value(json!({"id": "a", "text": "A"})).unwrap_err();
        assert_eq!(err, ValidationError::NotAList);
    }

    #[test]
    fn from_json_value_reports_index_of_item_missing_text() {
        let err = Template::from_json_value(json!([
            {"id": "a", "text": "A"},
            {"id": "b"}
        ]))
        .unwrap_err();
        match err {
            ValidationError::MalformedItem { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("text"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_json_value_rejects_scalar_elements() {
        let err = Template::from_json_value(json!(["progress"])).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedItem { index: 0, .. }));
    }

    #[test]
    fn from_json_str_rejects_broken_text() {
        let err = Template::from_json_str("[{\"id\": ").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
    }

    #[test]
    fn validate_rejects_blank_fields_and_zero_importance() {
        let blank_text = Template::new(vec![TemplateItem::new("a", "   ")]);
        assert!(matches!(
            blank_text.validate(),
            Err(ValidationError::EmptyField { field: "text", .. })
        ));

        let blank_sub_id =
            Template::new(vec![TemplateItem::new("a", "A").with_subitem(TemplateSubItem::new("", "x"))]);
        assert!(matches!(
            blank_sub_id.validate(),
            Err(ValidationError::EmptyField { field: "id", .. })
        ));

        let zero = Template::new(vec![TemplateItem::new("a", "A").with_importance(0)]);
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::InvalidImportance { importance: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_ids_colliding_after_flatten() {
        let template = Template::new(vec![
            TemplateItem::new("a", "A").with_subitem(TemplateSubItem::new("1", "A1")),
            TemplateItem::new("a:1", "shadow"),
        ]);
        assert_eq!(
            template.validate(),
            Err(ValidationError::DuplicateItemId("a:1".to_string()))
        );
    }

    #[test]
    fn json_text_omits_unset_subitem_importance() {
        let template = Template::new(vec![
            TemplateItem::new("a", "A").with_subitem(TemplateSubItem::new("1", "A1"))
        ]);
        let text = template.to_json_string().unwrap();
        let reparsed = Template::from_json_str(&text).unwrap();
        assert_eq!(reparsed, template);
        assert!(!text.contains("null"));
    }

    #[test]
    fn pretty_editor_text_parses_back_to_same_template() {
        let template = Template::builtin_default();
        let text = template.to_json_pretty().unwrap();
        assert!(text.contains('\n'));
        assert_eq!(Template::from_json_str(&text).unwrap(), template);
    }
}
