//! Repositories for keyword, audit, and trust score tables.

mod audits;
mod keywords;
mod trust;

pub use audits::{create_snippet, AuditsRepo};
pub use keywords::KeywordsRepo;
pub use trust::TrustRepo;

use chrono::{DateTime, Utc};

/// Parse a datetime from SQLite text (RFC3339 or SQLite default format).
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a JSON array column.
pub(crate) fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Row-mapping error for an unparseable enum column.
pub(crate) fn column_parse_error(idx: usize, what: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("invalid {}", what).into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_accepts_rfc3339() {
        let dt = parse_datetime("2026-03-01T12:30:00+00:00");
        assert_eq!(dt.to_rfc3339(), "2026-03-01T12:30:00+00:00");
    }

    #[test]
    fn parse_datetime_accepts_sqlite_format() {
        let dt = parse_datetime("2026-03-01 12:30:00");
        assert_eq!(dt.timestamp(), 1772368200);
    }

    #[test]
    fn parse_json_array_tolerates_garbage() {
        assert!(parse_json_array("not json").is_empty());
        assert_eq!(parse_json_array("[\"spam\"]"), vec!["spam".to_string()]);
    }
}
