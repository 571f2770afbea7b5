//! Input validation pipeline for raw item text.
//!
//! # Responsibility
//! - Decide accept/reject for one raw input line, short-circuiting on the
//!   first failure.
//! - Return the canonical sanitized text on success.
//!
//! # Invariants
//! - Checks run in a fixed order: empty, length, homoglyphs, normalization,
//!   control scan, pattern blacklist, encoding stability.
//! - After normalization, every later check reads the normalized value, not
//!   the raw input.
//! - The pattern blacklist is defense-in-depth over display escaping, not a
//!   substitute for it.

use crate::text::sanitize::{is_control_or_invisible, normalize};
use crate::text::MAX_TEXT_UNITS;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Full-width confusables of `< > " ' / \ %`.
///
/// Scanned before normalization: NFKC folds these into their ASCII forms,
/// so a post-normalization scan would never see them.
const HOMOGLYPHS: [char; 7] = ['＜', '＞', '＂', '＇', '／', '＼', '％'];

/// Markup/script-injection patterns rejected outright.
///
/// Escaping already neutralizes these for display; rejecting them as well
/// keeps hostile markup out of storage entirely.
static BLACKLIST: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?is)<script.*?>.*?</script>",
        r"(?is)<iframe.*?>",
        r"(?is)<object.*?>",
        r"(?is)<embed.*?>",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?is)<img.*?onerror",
        r"(?is)<svg.*?onload",
        r"(?is)<svg.*?xlink:href",
        r"(?i)eval\s*\(",
        r"(?i)expression\s*\(",
        r"(?is)<link.*?>",
        r"(?is)<style.*?>",
        r"(?i)vbscript:",
        r"(?i)data:",
        r"&#",
        r"(?i)\\u",
        r"(?i)\\x",
        r"(?is)<meta.*?>",
        r"(?is)<base.*?>",
        r"(?is)<form.*?>",
        r"(?i)srcdoc",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid blacklist regex"))
    .collect()
});

/// Rejection category for one raw input.
///
/// `Display` is the user-facing message; [`ValidationError::code`] is the
/// stable machine-readable category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input is empty after trimming.
    Empty,
    /// Trimmed input exceeds [`MAX_TEXT_UNITS`] UTF-16 code units.
    TooLong { units: usize },
    /// Control, format, or zero-width characters survive normalization.
    ControlCharacters,
    /// Full-width confusables of structural characters present.
    SuspiciousUnicode,
    /// Input matches the markup/script-injection blacklist.
    SuspiciousContent,
    /// Normalization is unstable (NFKD→NFKC disagrees with NFKC).
    EncodingAnomaly,
}

impl ValidationError {
    /// Stable machine-readable category for adapters and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong { .. } => "too_long",
            Self::ControlCharacters => "control_chars",
            Self::SuspiciousUnicode => "homoglyph",
            Self::SuspiciousContent => "blacklisted_pattern",
            Self::EncodingAnomaly => "encoding_anomaly",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "item cannot be empty"),
            Self::TooLong { units } => {
                write!(f, "item too long ({units} of max {MAX_TEXT_UNITS} characters)")
            }
            Self::ControlCharacters => write!(f, "invalid control characters detected"),
            Self::SuspiciousUnicode => write!(f, "suspicious unicode characters detected"),
            Self::SuspiciousContent => write!(f, "suspicious content detected"),
            Self::EncodingAnomaly => write!(f, "encoding anomaly detected"),
        }
    }
}

impl Error for ValidationError {}

/// Validates one raw input line, returning the sanitized canonical text.
///
/// # Contract
/// - First failing check wins; later checks do not run.
/// - `Ok` holds the trimmed, NFKC-normalized text, at most
///   [`MAX_TEXT_UNITS`] UTF-16 code units, free of control/format
///   characters.
/// - Idempotent on its own output: validating an `Ok` value again returns
///   the same value.
///
/// # Errors
/// One [`ValidationError`] naming the first check that failed.
pub fn validate(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let units = trimmed.encode_utf16().count();
    if units > MAX_TEXT_UNITS {
        return Err(ValidationError::TooLong { units });
    }

    if trimmed.chars().any(|c| HOMOGLYPHS.contains(&c)) {
        return Err(ValidationError::SuspiciousUnicode);
    }

    // Single normalization point; everything below reads `normalized`.
    let normalized = normalize(trimmed);
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Err(ValidationError::Empty);
    }

    if normalized.chars().any(is_control_or_invisible) {
        return Err(ValidationError::ControlCharacters);
    }

    if BLACKLIST.iter().any(|pattern| pattern.is_match(normalized)) {
        return Err(ValidationError::SuspiciousContent);
    }

    // Decompose-then-recompose must agree with the already-normalized text;
    // a mismatch indicates a non-canonical or unstable encoding.
    if !normalization_is_stable(normalized) {
        return Err(ValidationError::EncodingAnomaly);
    }

    Ok(normalized.to_string())
}

fn normalization_is_stable(normalized: &str) -> bool {
    use unicode_normalization::UnicodeNormalization;
    let recomposed: String = normalized.nfkd().collect::<String>().nfkc().collect();
    recomposed == normalized
}
