//! Ordered list ownership over an opaque byte store.
//!
//! # Responsibility
//! - Own the in-memory ordered record list and its mutation entry points.
//! - Serialize/rehydrate the list through the record coercer, tolerating
//!   stored corruption by silent drop.
//!
//! # Invariants
//! - List order is insertion order; no implicit sorting.
//! - Every in-memory record came through the coercer or the validated-input
//!   constructor.
//! - Stored bytes are never partially written; a rejected persist leaves
//!   them untouched.
//! - Corruption recovery is silent toward callers and loud in diagnostics
//!   (`LoadReport` plus log events).

use crate::model::record::ItemRecord;
use crate::store::{ByteStore, ByteStoreError};
use crate::text::validate::{validate, ValidationError};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Serialized-size ceiling for one stored list, in bytes.
pub const DEFAULT_MAX_SERIALIZED_BYTES: usize = 5_000_000;

const DEFAULT_KEY: &str = "todos";

pub type StoreResult<T> = Result<T, StoreError>;

/// List store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Byte-store key holding the serialized list.
    pub key: String,
    /// Ceiling on the serialized list size; larger persists are rejected.
    pub max_serialized_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            max_serialized_bytes: DEFAULT_MAX_SERIALIZED_BYTES,
        }
    }
}

/// Diagnostic summary of one `load` pass.
///
/// Corruption recovery is silent toward the user; this report (plus log
/// events) is the diagnostic hook that keeps the information visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Records accepted into the in-memory list.
    pub loaded: usize,
    /// Stored elements dropped by the record coercer.
    pub dropped: usize,
    /// Whether the stored value was discarded as corrupt or unreadable.
    pub reset: bool,
}

/// Operation failure for list mutations and persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected by the validation pipeline; list unchanged.
    Validation(ValidationError),
    /// Index outside the current list bounds; list unchanged.
    InvalidIndex { index: usize, len: usize },
    /// Serialized list exceeds the configured ceiling; stored bytes unchanged.
    StorageLimit { size: usize, limit: usize },
    /// List serialization failed.
    Serialize(serde_json::Error),
    /// Byte-store backend failure.
    Backend(ByteStoreError),
}

impl StoreError {
    /// Stable machine-readable category for adapters and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::InvalidIndex { .. } => "invalid_index",
            Self::StorageLimit { .. } => "storage_limit",
            Self::Serialize(_) | Self::Backend(_) => "storage_backend",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidIndex { index, len } => {
                write!(f, "invalid item index {index} for list of {len}")
            }
            Self::StorageLimit { size, limit } => {
                write!(f, "storage limit exceeded: {size} bytes over {limit}-byte ceiling")
            }
            Self::Serialize(err) => write!(f, "failed to serialize list: {err}"),
            Self::Backend(err) => write!(f, "storage backend failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Backend(err) => Some(err),
            Self::InvalidIndex { .. } | Self::StorageLimit { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ByteStoreError> for StoreError {
    fn from(value: ByteStoreError) -> Self {
        Self::Backend(value)
    }
}

/// Owner of the ordered item list and sole writer of its storage key.
///
/// Explicitly instantiated and passed around; there is no ambient singleton.
/// All methods run to completion on the caller's thread.
pub struct ListStore<S: ByteStore> {
    store: S,
    config: StoreConfig,
    items: Vec<ItemRecord>,
}

impl<S: ByteStore> ListStore<S> {
    /// Creates an empty list store over `store` with default configuration.
    ///
    /// Call [`ListStore::load`] to rehydrate previously stored records.
    pub fn new(store: S) -> Self {
        Self::with_config(store, StoreConfig::default())
    }

    pub fn with_config(store: S, config: StoreConfig) -> Self {
        Self {
            store,
            config,
            items: Vec::new(),
        }
    }

    /// Rehydrates the list from stored bytes.
    ///
    /// # Contract
    /// - Absent key: empty list.
    /// - Unreadable, unparseable, or non-array value: discard the stored
    ///   value (best effort), start empty, report `reset = true`.
    /// - Every array element goes through the record coercer; failures are
    ///   dropped silently, order of the survivors is preserved.
    /// - Never fails; corruption is a diagnostic, not an error.
    pub fn load(&mut self) -> LoadReport {
        self.items.clear();

        let bytes = match self.store.get(&self.config.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return LoadReport::default(),
            Err(err) => {
                warn!(
                    "event=store_load module=store status=reset reason=backend_read error={err}"
                );
                return LoadReport {
                    reset: true,
                    ..LoadReport::default()
                };
            }
        };

        let parsed: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=store_load module=store status=reset reason=unparseable error={err}");
                self.discard_stored();
                return LoadReport {
                    reset: true,
                    ..LoadReport::default()
                };
            }
        };

        let elements = match parsed.as_array() {
            Some(elements) => elements,
            None => {
                warn!("event=store_load module=store status=reset reason=not_a_sequence");
                self.discard_stored();
                return LoadReport {
                    reset: true,
                    ..LoadReport::default()
                };
            }
        };

        let mut dropped = 0;
        for element in elements {
            match ItemRecord::coerce(element) {
                Some(record) => self.items.push(record),
                None => dropped += 1,
            }
        }

        let report = LoadReport {
            loaded: self.items.len(),
            dropped,
            reset: false,
        };
        info!(
            "event=store_load module=store status=ok loaded={} dropped={}",
            report.loaded, report.dropped
        );
        report
    }

    /// Validates raw input and appends a fresh record.
    ///
    /// # Contract
    /// - Rejection leaves the list and stored bytes unchanged.
    /// - Acceptance appends at the end and persists immediately. A persist
    ///   failure is surfaced, with the appended record kept in memory and
    ///   the stored bytes untouched.
    ///
    /// # Errors
    /// `StoreError::Validation` on rejected input, otherwise persist errors.
    pub fn add(&mut self, raw: &str) -> StoreResult<&ItemRecord> {
        let sanitized = validate(raw)?;
        self.items.push(ItemRecord::from_validated(&sanitized));
        self.persist()?;
        info!("event=item_added module=store status=ok count={}", self.items.len());
        Ok(self.items.last().expect("list is non-empty after append"))
    }

    /// Flips the completion flag of the record at `index`.
    ///
    /// Returns the new completion state.
    ///
    /// # Errors
    /// `StoreError::InvalidIndex` out of bounds (no change), otherwise
    /// persist errors.
    pub fn toggle(&mut self, index: usize) -> StoreResult<bool> {
        let len = self.items.len();
        let record = self
            .items
            .get_mut(index)
            .ok_or(StoreError::InvalidIndex { index, len })?;
        let completed = !record.completed();
        record.set_completed(completed);
        self.persist()?;
        Ok(completed)
    }

    /// Removes and returns the record at `index`, preserving the order of
    /// the rest.
    ///
    /// # Errors
    /// `StoreError::InvalidIndex` out of bounds (no change), otherwise
    /// persist errors.
    pub fn remove(&mut self, index: usize) -> StoreResult<ItemRecord> {
        let len = self.items.len();
        if index >= len {
            return Err(StoreError::InvalidIndex { index, len });
        }
        let removed = self.items.remove(index);
        self.persist()?;
        Ok(removed)
    }

    /// Serializes the list and writes it to the byte store.
    ///
    /// # Contract
    /// - Every record is re-run through the coercer before serialization,
    ///   guarding against in-memory tampering.
    /// - A serialized size above the configured ceiling aborts the write;
    ///   stored bytes are never partially replaced.
    pub fn persist(&mut self) -> StoreResult<()> {
        let revalidated: Vec<ItemRecord> = self
            .items
            .iter()
            .filter_map(|record| {
                serde_json::to_value(record)
                    .ok()
                    .as_ref()
                    .and_then(ItemRecord::coerce)
            })
            .collect();

        let payload = serde_json::to_vec(&revalidated).map_err(StoreError::Serialize)?;
        if payload.len() > self.config.max_serialized_bytes {
            warn!(
                "event=store_persist module=store status=rejected reason=storage_limit size={} limit={}",
                payload.len(),
                self.config.max_serialized_bytes
            );
            return Err(StoreError::StorageLimit {
                size: payload.len(),
                limit: self.config.max_serialized_bytes,
            });
        }

        self.store.set(&self.config.key, payload)?;
        Ok(())
    }

    /// Current ordered list, including invisible empty-text records.
    pub fn records(&self) -> &[ItemRecord] {
        &self.items
    }

    /// Records the presentation adapter should render.
    ///
    /// Empty-text records stay in storage but are filtered here.
    pub fn visible(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.iter().filter(|record| record.is_visible())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read access to the underlying byte store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the underlying byte store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn discard_stored(&mut self) {
        if let Err(err) = self.store.delete(&self.config.key) {
            warn!("event=store_discard module=store status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryByteStore;

    #[test]
    fn add_appends_in_insertion_order() {
        let mut list = ListStore::new(MemoryByteStore::new());
        list.add("first").unwrap();
        list.add("second").unwrap();
        let texts: Vec<&str> = list.records().iter().map(|r| r.text()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn rejected_add_leaves_list_unchanged() {
        let mut list = ListStore::new(MemoryByteStore::new());
        let err = list.add("   ").unwrap_err();
        assert_eq!(err.code(), "empty");
        assert!(list.is_empty());
    }

    #[test]
    fn visible_filters_empty_text_records() {
        let mut list = ListStore::new(MemoryByteStore::new());
        list.add("keep me").unwrap();
        assert_eq!(list.visible().count(), 1);
    }
}
