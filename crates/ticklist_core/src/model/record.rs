//! Item record and the record coercer.
//!
//! # Responsibility
//! - Define the persisted record shape (`text`, `completed`, `id`,
//!   `createdAt`).
//! - Turn arbitrary decoded values into well-formed records or nothing.
//!
//! # Invariants
//! - Fields are private; the coercer and the validated-input constructor are
//!   the only construction paths.
//! - `Serialize` only: storage rehydration must go through [`ItemRecord::coerce`],
//!   so a `Deserialize` derive is deliberately absent.
//! - `created_at` is assigned at creation and never mutated.

use crate::text::sanitize::sanitize_for_display;
use crate::text::MAX_TEXT_UNITS;
use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// One persisted list entry.
///
/// Mutable only through the completion toggle; everything else is fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    /// Display-hardened text, at most 500 units, entity-escaped.
    text: String,
    /// Completion flag, the only mutable field.
    completed: bool,
    /// Opaque identifier, unique within one list's lifetime.
    id: String,
    /// Creation time in epoch milliseconds, immutable after construction.
    #[serde(rename = "createdAt")]
    created_at: i64,
}

impl ItemRecord {
    /// Coerces an arbitrary decoded value into a well-formed record.
    ///
    /// # Contract
    /// - Non-object input yields `None`; never panics.
    /// - `text`: textual values are truncated and display-hardened; anything
    ///   else becomes empty text. Empty-text records are kept in storage and
    ///   filtered only from rendering.
    /// - `completed`: JSON booleans are honored, everything else is `false`.
    /// - `id`: non-empty strings and numbers are kept; otherwise a fresh
    ///   identifier is synthesized.
    /// - `createdAt`: integer values are kept; otherwise the current time.
    pub fn coerce(candidate: &Value) -> Option<ItemRecord> {
        let fields = candidate.as_object()?;

        let text = match fields.get("text").and_then(Value::as_str) {
            Some(raw) => sanitize_for_display(&truncate_chars(raw, MAX_TEXT_UNITS)),
            None => String::new(),
        };

        let completed = fields
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let id = match fields.get("id") {
            Some(Value::String(provided)) if !provided.is_empty() => provided.clone(),
            Some(Value::Number(provided)) => provided.to_string(),
            _ => fresh_id(),
        };

        let created_at = fields
            .get("createdAt")
            .and_then(Value::as_i64)
            .unwrap_or_else(now_epoch_ms);

        Some(ItemRecord {
            text,
            completed,
            id,
            created_at,
        })
    }

    /// Builds a fresh record from validator output.
    ///
    /// Produces exactly the shape [`ItemRecord::coerce`] would: hardened
    /// text, `completed = false`, synthesized id and timestamp.
    pub fn from_validated(sanitized: &str) -> ItemRecord {
        ItemRecord {
            text: sanitize_for_display(sanitized),
            completed: false,
            id: fresh_id(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time in epoch milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Records with empty text are stored but never rendered.
    pub fn is_visible(&self) -> bool {
        !self.text.is_empty()
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

/// Truncates to at most `limit` chars on a char boundary.
///
/// Salvage path for stored data; validated input is already under the limit.
fn truncate_chars(raw: &str, limit: usize) -> String {
    raw.chars().take(limit).collect()
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
