//! Display masking for regulated identifiers.
//!
//! Masking is lossy and needs no key. The output reveals at most the last
//! four characters of the input and has a fixed prefix, so masked values
//! are safe to show in UIs and logs.

use serde::Serialize;

/// Prefix placed before the last four characters of an SSN.
pub const SSN_MASK_PREFIX: &str = "***-**-";

/// Returned when the input is too short to reveal anything.
pub const SSN_FULLY_MASKED: &str = "***-**-****";

/// Prefix placed before the last four digits of an account number.
pub const ACCOUNT_MASK_PREFIX: &str = "****";

/// Number of trailing characters left visible.
pub const VISIBLE_SUFFIX: usize = 4;

/// A value that has already been masked.
///
/// Only the mask functions in this module construct one, so a `Masked`
/// in a response type is proof the raw value never reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Masked(String);

impl Masked {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Masked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Masked {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Masks an SSN-shaped value, keeping the last four characters.
///
/// The input is treated as opaque: dashes are not stripped first, so
/// `"123-45-6789"` and `"123456789"` both become `"***-**-6789"`.
/// Inputs shorter than four characters (including empty) become
/// `"***-**-****"`.
pub fn mask(value: &str) -> Masked {
    match last_chars(value, VISIBLE_SUFFIX) {
        Some(suffix) => Masked(format!("{SSN_MASK_PREFIX}{suffix}")),
        None => Masked(SSN_FULLY_MASKED.to_string()),
    }
}

/// Masks a bank account number as `****1234`.
pub fn mask_account_number(value: &str) -> Masked {
    match last_chars(value, VISIBLE_SUFFIX) {
        Some(suffix) => Masked(format!("{ACCOUNT_MASK_PREFIX}{suffix}")),
        None => Masked(ACCOUNT_MASK_PREFIX.to_string()),
    }
}

/// Last `n` characters of `value`, or `None` when it has fewer than `n`.
fn last_chars(value: &str, n: usize) -> Option<&str> {
    let count = value.chars().count();
    if count < n {
        return None;
    }
    let start = value
        .char_indices()
        .nth(count - n)
        .map_or(value.len(), |(i, _)| i);
    Some(&value[start..])
}
