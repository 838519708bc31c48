// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored timestamp into UTC.
///
/// Accepts RFC3339 and the Postgres text form (`2024-01-08 00:00:00+00`).
/// Returns `None` for anything else.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Parse a run date: either `YYYY-MM-DD` or a full timestamp.
pub fn parse_run_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_utc(raw).map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_and_postgres_forms() {
        let a = parse_utc("2024-01-08T00:00:00Z").unwrap();
        let b = parse_utc("2024-01-08 00:00:00+00").unwrap();
        let c = parse_utc("2024-01-07T21:00:00-03:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(format_utc_rfc3339(a), "2024-01-08T00:00:00Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_utc("").is_none());
        assert!(parse_utc("2024-13-45").is_none());
    }

    #[test]
    fn test_parse_run_date() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_run_date("2024-03-05"), Some(d));
        assert_eq!(parse_run_date("2024-03-05T07:30:00Z"), Some(d));
        assert_eq!(parse_run_date("05/03/2024"), None);
    }
}
