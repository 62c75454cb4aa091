//! Unicode canonicalization for file, sheet and group names.
//!
//! Filenames created on macOS are typically stored decomposed (NFD) while the
//! same Hangul text typed on Windows or Linux is composed (NFC). Every name
//! comparison in the dashboard goes through this module.

use unicode_normalization::UnicodeNormalization;

/// Canonical composed form (NFC) of `name`.
pub fn normalize_name(name: &str) -> String {
    name.nfc().collect()
}

/// Canonical decomposed form (NFD) of `name`.
pub fn decompose_name(name: &str) -> String {
    name.nfd().collect()
}

/// `true` when `a` and `b` render identically under either normalization form.
///
/// Equality of the composed forms or of the decomposed forms is sufficient.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b) || decompose_name(a) == decompose_name(b)
}
