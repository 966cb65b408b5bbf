//! Database helper functions for safe type conversions.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

use crate::models::SessionKind;

/// Parse a UUID string from database, returning a rusqlite error on failure.
pub fn parse_uuid(idx: usize, s: &str) -> rusqlite::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse an RFC3339 datetime string from database, returning a rusqlite error on failure.
pub fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Fixed-width RFC3339 so stored timestamps sort correctly as text.
pub fn fmt_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_kind(idx: usize, s: &str) -> rusqlite::Result<SessionKind> {
    s.parse::<SessionKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// SQLite stores integers as i64; durations are never negative.
pub fn to_seconds(idx: usize, value: i64) -> rusqlite::Result<u64> {
    u64::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

pub fn to_sql_seconds(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
