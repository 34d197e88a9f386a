//! Formatting utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 timestamp in UTC with millisecond precision
/// (e.g. `2024-03-01T12:00:00.000Z`)
pub fn iso_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a byte count in human-readable form
pub fn bytes(size: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let size_f = size as f64;
    if size_f < KIB {
        format!("{} B", size)
    } else if size_f < MIB {
        format!("{:.1} KiB", size_f / KIB)
    } else {
        format!("{:.1} MiB", size_f / MIB)
    }
}

/// Truncate a string to max length (in characters) with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Replace a secret with a fixed-width mask
pub fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}
