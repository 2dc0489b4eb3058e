//! Formatting helpers for log lines: counts and elapsed time.

use std::time::Duration;

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format an elapsed duration as seconds with four decimals.
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.4} seconds", elapsed.as_secs_f64())
}
