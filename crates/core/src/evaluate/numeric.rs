//! Numeric extraction from decorated probe values.
//!
//! Probe output is rarely a bare number: `"45%"`, `"12 items"` and
//! `"load average: 1.25"` all need to yield a magnitude.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CheckError;

/// First run of digits, optionally with one decimal part.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// Unit decorations stripped before searching for a number.
const UNIT_DECORATIONS: &[&str] = &["%", "개", "items"];

/// Extract the first numeric magnitude from `text`.
///
/// Returns [`CheckError::NoNumericValue`] when no digit run exists or the
/// parsed value is not finite.
pub fn extract(text: &str) -> Result<f64, CheckError> {
    let mut cleaned = text.to_string();
    for decoration in UNIT_DECORATIONS {
        cleaned = cleaned.replace(decoration, "");
    }

    let found = NUMBER_RE
        .find(cleaned.trim())
        .ok_or(CheckError::NoNumericValue)?;

    found
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(CheckError::NoNumericValue)
}
