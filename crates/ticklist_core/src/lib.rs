//! Core logic for the ticklist widget.
//! This crate is the single source of truth for input hardening and list
//! persistence invariants; presentation adapters stay thin over it.

pub mod logging;
pub mod model;
pub mod store;
pub mod text;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::ItemRecord;
pub use store::list_store::{
    ListStore, LoadReport, StoreConfig, StoreError, StoreResult, DEFAULT_MAX_SERIALIZED_BYTES,
};
pub use store::{ByteStore, ByteStoreError, ByteStoreResult, FileByteStore, MemoryByteStore};
pub use text::validate::{validate, ValidationError};
pub use text::MAX_TEXT_UNITS;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
