// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.
//!
//! Stored timestamps are fixed-width RFC3339 strings with nanosecond
//! precision and a `Z` suffix, so lexicographic order equals time order.
//! Both storage backends sort on these strings directly.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as fixed-width RFC3339 (nanoseconds, `Z` suffix).
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Current time in stored form.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a stored timestamp back into UTC.
pub fn parse_utc_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_width_sorts_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let later = earlier + chrono::Duration::nanoseconds(500);

        let a = format_utc_rfc3339(earlier);
        let b = format_utc_rfc3339(later);

        assert_eq!(a, "2024-01-01T10:00:00.000000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_utc_rfc3339(&b), Some(later));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_utc_rfc3339("yesterday"), None);
    }
}
