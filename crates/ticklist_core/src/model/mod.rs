//! Domain model for persisted list items.
//!
//! # Responsibility
//! - Define the canonical item record and its only construction paths.
//! - Coerce untrusted decoded values into well-formed records.
//!
//! # Invariants
//! - An `ItemRecord` can only come into existence through
//!   `ItemRecord::coerce` or `ItemRecord::from_validated`.
//! - Record text is always display-hardened before it is stored.

pub mod record;
