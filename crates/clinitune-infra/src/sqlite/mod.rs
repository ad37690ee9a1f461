//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Every repository maps rows through a
//! private `*Row` struct and stores UUIDs and timestamps as text.

pub mod appointment;
pub mod auth_session;
pub mod chat;
pub mod notification;
pub mod pool;
pub mod task;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};
use clinitune_types::error::RepositoryError;
use uuid::Uuid;

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

pub(crate) fn parse_uuid(s: &str, field: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {field}: {e}")))
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime_sorts_lexically() {
        let a = "2024-05-10T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let b = "2024-05-10T09:00:00.5Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(format_datetime(&a), "2024-05-10T09:00:00.000000Z");
        assert!(format_datetime(&a) < format_datetime(&b));
        assert_eq!(parse_datetime(&format_datetime(&b)).unwrap(), b);
    }
}
