//! Text hardening pipeline for untrusted item input.
//!
//! # Responsibility
//! - Canonicalize, strip, and escape untrusted text (`sanitize`).
//! - Accept/reject one raw input line with a stable error taxonomy
//!   (`validate`).
//!
//! # Invariants
//! - Normalization runs once per input; every later check re-reads the same
//!   normalized value, never the raw input.
//! - Accepted text is at most [`MAX_TEXT_UNITS`] UTF-16 code units.

pub mod sanitize;
pub mod validate;

/// Maximum accepted item length, counted in UTF-16 code units to match the
/// stored schema's length semantics.
pub const MAX_TEXT_UNITS: usize = 500;
