//! Template store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the singleton template row (`template.id = 1`).
//! - Validate template structure before any write.
//!
//! # Invariants
//! - At most one template row exists.
//! - `load` never fails on unreadable stored data; it falls back to
//!   `Template::builtin_default()` and logs the fallback.
//! - A rejected `save` leaves the stored row untouched.

use crate::db::migrations::apply_migrations;
use crate::model::template::Template;
use crate::repo::error::{RepoError, RepoResult};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

const TEMPLATE_SINGLETON_ID: i64 = 1;

/// Repository interface for the singleton checklist template.
pub trait TemplateStore {
    /// Ensures the backing schema exists.
    fn init_schema(&self) -> RepoResult<()>;
    /// Returns the stored template or the built-in default.
    fn load(&self) -> RepoResult<Template>;
    /// Validates and replaces the stored template.
    fn save(&self, template: &Template) -> RepoResult<()>;
    /// Inserts the built-in default iff no template is stored yet.
    fn ensure_default(&self) -> RepoResult<()>;

    /// Validates untyped editor JSON, fills defaults and stores it.
    ///
    /// Returns the normalized template that was persisted.
    fn save_json(&self, value: Value) -> RepoResult<Template> {
        let template = Template::from_json_value(value)?;
        self.save(&template)?;
        Ok(template)
    }
}

/// SQLite-backed template store.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TemplateStore for SqliteTemplateRepository<'_> {
    fn init_schema(&self) -> RepoResult<()> {
        apply_migrations(self.conn)?;
        Ok(())
    }

    fn load(&self) -> RepoResult<Template> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM template WHERE id = ?1;",
                [TEMPLATE_SINGLETON_ID],
                |row| row.get(0),
            )
            .optional()?;

        let Some(data) = stored else {
            debug!("event=template_load module=repo status=ok source=builtin reason=missing");
            return Ok(Template::builtin_default());
        };

        match Template::from_json_str(&data) {
            Ok(template) => Ok(template),
            Err(err) => {
                warn!(
                    "event=template_load module=repo status=fallback source=builtin error_code=template_malformed error={}",
                    err
                );
                Ok(Template::builtin_default())
            }
        }
    }

    fn save(&self, template: &Template) -> RepoResult<()> {
        template.validate()?;
        let data = template
            .to_json_string()
            .map_err(|err| RepoError::InvalidData(format!("template serialization: {err}")))?;

        self.conn.execute(
            "INSERT INTO template (id, data) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data;",
            params![TEMPLATE_SINGLETON_ID, data],
        )?;

        info!(
            "event=template_save module=repo status=ok item_count={}",
            template.items.len()
        );
        Ok(())
    }

    fn ensure_default(&self) -> RepoResult<()> {
        let data = Template::builtin_default()
            .to_json_string()
            .map_err(|err| RepoError::InvalidData(format!("template serialization: {err}")))?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO template (id, data) VALUES (?1, ?2);",
            params![TEMPLATE_SINGLETON_ID, data],
        )?;

        if inserted > 0 {
            info!("event=template_seed module=repo status=ok source=builtin");
        }
        Ok(())
    }
}
