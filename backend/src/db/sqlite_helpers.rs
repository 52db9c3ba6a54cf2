//! SQLite helper utilities for type conversion
//!
//! SQLite has no native timestamp type, so timestamps are stored as RFC 3339
//! text and converted at the repository boundary.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

// ============================================================================
// Timestamp Helpers (stored as ISO8601 TEXT in SQLite)
// ============================================================================

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Parse an ISO8601 string to DateTime
#[inline]
pub fn str_to_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Try parsing SQLite's datetime() format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
                .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
        })
}

/// Decode a timestamp column inside a `FromRow` impl
pub(crate) fn decode_datetime(s: &str) -> sqlx::Result<DateTime<Utc>> {
    str_to_datetime(s).map_err(|e| sqlx::Error::Decode(e.into()))
}

// ============================================================================
// Query Building Helpers
// ============================================================================

/// Escape `LIKE` wildcards so user input matches literally.
/// Pair with `ESCAPE '\'` in the SQL.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_datetime_roundtrip() {
        let now = now_iso8601();
        let parsed = str_to_datetime(&now).unwrap();
        assert_eq!(parsed.to_rfc3339(), now);
    }

    #[test]
    fn test_sqlite_datetime_format() {
        let parsed = str_to_datetime("2024-03-05 10:11:12").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 3);
        assert_eq!(parsed.day(), 5);
    }

    #[test]
    fn test_invalid_datetime() {
        assert!(str_to_datetime("yesterday").is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("graphql"), "graphql");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
