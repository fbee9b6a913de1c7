//! Category name normalization.

use unicode_normalization::UnicodeNormalization;

use crate::InputError;

/// Normalizes a user supplied category name into the key stored in the
/// ledger: trimmed, inner whitespace collapsed to single spaces, NFC.
pub(crate) fn normalize_category(input: &str) -> Result<String, InputError> {
    let mut out = String::new();
    for token in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() {
        return Err(InputError::InvalidCategory);
    }
    Ok(out.nfc().collect())
}
