use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use super::helpers::{fmt_datetime, parse_datetime, parse_kind, parse_uuid, to_seconds, to_sql_seconds};
use super::Database;
use crate::models::{SessionKind, TimeRecord};

impl Database {
    /// Store a completed timer session
    ///
    /// # Errors
    ///
    /// Returns an error if the duration is zero or the insert fails
    pub fn insert_time_record(&self, record: &TimeRecord) -> Result<()> {
        if record.duration_seconds == 0 {
            bail!("Refusing to store a {} session of zero seconds", record.kind);
        }
        self.conn()?.execute(
            "INSERT INTO time_records (id, profile_id, kind, duration_seconds, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.to_string(),
                record.profile_id.to_string(),
                record.kind.as_str(),
                to_sql_seconds(record.duration_seconds),
                fmt_datetime(&record.created_at),
            ],
        )?;
        log::debug!(
            "Stored {} record of {}s for profile {}",
            record.kind,
            record.duration_seconds,
            record.profile_id
        );
        Ok(())
    }

    /// Build and store a record stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns an error if the duration is zero or the insert fails
    pub fn add_time_record(
        &self,
        profile_id: Uuid,
        kind: SessionKind,
        duration_seconds: u64,
    ) -> Result<TimeRecord> {
        let record = TimeRecord::new(profile_id, kind, duration_seconds);
        self.insert_time_record(&record)?;
        Ok(record)
    }

    /// Get records for a profile, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_time_records(&self, profile_id: Uuid, limit: Option<usize>) -> Result<Vec<TimeRecord>> {
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, profile_id, kind, duration_seconds, created_at
             FROM time_records
             WHERE profile_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let records = stmt
            .query_map(params![profile_id.to_string(), limit], Self::row_to_time_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get records for a profile created within `[start, end]`, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_time_records_in_range(
        &self,
        profile_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, profile_id, kind, duration_seconds, created_at
             FROM time_records
             WHERE profile_id = ?1 AND created_at >= ?2 AND created_at <= ?3
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let records = stmt
            .query_map(
                params![profile_id.to_string(), fmt_datetime(&start), fmt_datetime(&end)],
                Self::row_to_time_record,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn row_to_time_record(row: &rusqlite::Row) -> rusqlite::Result<TimeRecord> {
        Ok(TimeRecord {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            profile_id: parse_uuid(1, &row.get::<_, String>(1)?)?,
            kind: parse_kind(2, &row.get::<_, String>(2)?)?,
            duration_seconds: to_seconds(3, row.get(3)?)?,
            created_at: parse_datetime(4, &row.get::<_, String>(4)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record_at(profile_id: Uuid, kind: SessionKind, secs: u64, at: DateTime<Utc>) -> TimeRecord {
        TimeRecord {
            id: Uuid::new_v4(),
            profile_id,
            kind,
            duration_seconds: secs,
            created_at: at,
        }
    }

    #[test]
    fn test_records_are_listed_most_recent_first() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        db.insert_time_record(&record_at(profile.id, SessionKind::Work, 125, base))
            .unwrap();
        db.insert_time_record(&record_at(
            profile.id,
            SessionKind::Leisure,
            30,
            base + Duration::minutes(10),
        ))
        .unwrap();

        let records = db.get_time_records(profile.id, None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, SessionKind::Leisure);
        assert_eq!(records[0].duration_seconds, 30);
        assert_eq!(records[1].kind, SessionKind::Work);
        assert_eq!(records[1].duration_seconds, 125);
        assert_eq!(records[1].created_at, base);
    }

    #[test]
    fn test_records_are_scoped_to_profile() {
        let db = Database::open_in_memory().unwrap();
        let ana = db.create_profile("ana").unwrap();
        let bruno = db.create_profile("bruno").unwrap();

        db.add_time_record(ana.id, SessionKind::Work, 60).unwrap();
        db.add_time_record(bruno.id, SessionKind::Work, 90).unwrap();

        let records = db.get_time_records(ana.id, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_seconds, 60);
    }

    #[test]
    fn test_limit() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        for secs in 1..=5 {
            db.add_time_record(profile.id, SessionKind::Work, secs).unwrap();
        }

        let records = db.get_time_records(profile.id, Some(2)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duration_seconds, 5);
        assert_eq!(records[1].duration_seconds, 4);
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        assert!(db.add_time_record(profile.id, SessionKind::Work, 0).is_err());
        assert!(db.get_time_records(profile.id, None).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(db
            .add_time_record(Uuid::new_v4(), SessionKind::Work, 10)
            .is_err());
    }

    #[test]
    fn test_range_query() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        let day = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        db.insert_time_record(&record_at(profile.id, SessionKind::Work, 10, day - Duration::hours(1)))
            .unwrap();
        db.insert_time_record(&record_at(profile.id, SessionKind::Work, 20, day + Duration::hours(8)))
            .unwrap();
        db.insert_time_record(&record_at(profile.id, SessionKind::Work, 30, day + Duration::days(1)))
            .unwrap();

        let records = db
            .get_time_records_in_range(profile.id, day, day + Duration::hours(23))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_seconds, 20);
    }

    #[test]
    fn test_records_removed_with_profile() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        db.add_time_record(profile.id, SessionKind::Work, 10).unwrap();

        db.delete_profile(profile.id).unwrap();
        assert!(db.get_time_records(profile.id, None).unwrap().is_empty());
    }
}
