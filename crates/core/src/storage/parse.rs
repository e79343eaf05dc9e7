//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;

use crate::models::{HistoryAction, Schedule};

fn conversion_error<E>(e: E) -> SqlError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    SqlError::FromSqlConversionFailure(0, Type::Text, e.into())
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_error)
}

/// Parse an optional DateTime from an RFC3339 string
pub fn parse_datetime_opt(s: Option<String>) -> Result<Option<DateTime<Utc>>, SqlError> {
    s.map(|s| parse_datetime(&s)).transpose()
}

/// Parse a calendar date stored as `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Result<NaiveDate, SqlError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(conversion_error)
}

/// Parse an optional recurrence schedule
pub fn parse_schedule_opt(s: Option<String>) -> Result<Option<Schedule>, SqlError> {
    s.map(|s| s.parse::<Schedule>().map_err(conversion_error))
        .transpose()
}

/// Parse a history action column
pub fn parse_action(s: &str) -> Result<HistoryAction, SqlError> {
    s.parse::<HistoryAction>().map_err(conversion_error)
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_roundtrip() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&now.to_rfc3339()).unwrap(), now);
        assert!(parse_datetime("yesterday").is_err());
        assert_eq!(parse_datetime_opt(None).unwrap(), None);
    }

    #[test]
    fn test_parse_stored_enums() {
        assert_eq!(parse_schedule_opt(Some("weekly".into())).unwrap(), Some(Schedule::Weekly));
        assert!(parse_schedule_opt(Some("sometimes".into())).is_err());
        assert_eq!(parse_action("DELETE").unwrap(), HistoryAction::Delete);
        assert!(parse_action("delete").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
