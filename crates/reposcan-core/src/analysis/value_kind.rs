//! Value classification: missing-value detection, kind inference, and
//! fractional precision.
//!
//! Zero-allocation hot path: every cell of every scanned table passes
//! through these functions.
use crate::model::ValueKind;

/// Placeholders that mean "no value" and are skipped entirely.
pub const MISSING_VALUES: [&str; 3] = ["", "?", "."];

#[inline]
pub fn is_missing(value: &str) -> bool {
    MISSING_VALUES.contains(&value)
}

/// Classify a single (non-missing) value.
///
/// Integers must fit in `i64`. Anything else that parses as a finite `f64`
/// is a float; `inf` / `NaN` spellings count as text.
pub fn classify_value(value: &str) -> ValueKind {
    if value.parse::<i64>().is_ok() {
        return ValueKind::Integer;
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => ValueKind::Float,
        _ => ValueKind::Text,
    }
}

/// Number of digits after the decimal point in the mantissa of `value`.
///
/// `"1.250"` → 3, `"6.02e23"` → 2, `"42"` → 0.
pub fn fractional_precision(value: &str) -> usize {
    let mantissa = value.split(['e', 'E']).next().unwrap_or("");
    match mantissa.split_once('.') {
        Some((_, frac)) => frac.bytes().take_while(u8::is_ascii_digit).count(),
        None => 0,
    }
}

/// Width of a value in characters.
#[inline]
pub fn value_width(value: &str) -> usize {
    value.chars().count()
}
