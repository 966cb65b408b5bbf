use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::helpers::{fmt_datetime, parse_datetime, parse_uuid, to_seconds, to_sql_seconds};
use super::Database;
use crate::models::TimerSnapshot;

impl Database {
    /// Save the timer counters for a profile, replacing any earlier snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn save_snapshot(&self, snapshot: &TimerSnapshot) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO timer_snapshots
                (profile_id, work_seconds, leisure_seconds, work_running, leisure_running, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                snapshot.profile_id.to_string(),
                to_sql_seconds(snapshot.work_seconds),
                to_sql_seconds(snapshot.leisure_seconds),
                i32::from(snapshot.work_running),
                i32::from(snapshot.leisure_running),
                fmt_datetime(&snapshot.saved_at),
            ],
        )?;
        log::debug!(
            "Saved timer snapshot for {} (work: {}s, leisure: {}s)",
            snapshot.profile_id,
            snapshot.work_seconds,
            snapshot.leisure_seconds
        );
        Ok(())
    }

    /// Load the saved timer counters for a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn load_snapshot(&self, profile_id: Uuid) -> Result<Option<TimerSnapshot>> {
        let snapshot = self
            .conn()?
            .query_row(
                "SELECT profile_id, work_seconds, leisure_seconds, work_running, leisure_running, saved_at
                 FROM timer_snapshots WHERE profile_id = ?1",
                params![profile_id.to_string()],
                |row| {
                    Ok(TimerSnapshot {
                        profile_id: parse_uuid(0, &row.get::<_, String>(0)?)?,
                        work_seconds: to_seconds(1, row.get(1)?)?,
                        leisure_seconds: to_seconds(2, row.get(2)?)?,
                        work_running: row.get::<_, i32>(3)? != 0,
                        leisure_running: row.get::<_, i32>(4)? != 0,
                        saved_at: parse_datetime(5, &row.get::<_, String>(5)?)?,
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }

    /// Remove the saved timer counters for a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn clear_snapshot(&self, profile_id: Uuid) -> Result<()> {
        self.conn()?.execute(
            "DELETE FROM timer_snapshots WHERE profile_id = ?1",
            params![profile_id.to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_snapshot_roundtrip_and_clear() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        assert!(db.load_snapshot(profile.id).unwrap().is_none());

        let snapshot = TimerSnapshot {
            profile_id: profile.id,
            work_seconds: 42,
            leisure_seconds: 7,
            work_running: true,
            leisure_running: false,
            saved_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };
        db.save_snapshot(&snapshot).unwrap();
        assert_eq!(db.load_snapshot(profile.id).unwrap(), Some(snapshot.clone()));

        let newer = TimerSnapshot {
            work_seconds: 50,
            ..snapshot
        };
        db.save_snapshot(&newer).unwrap();
        assert_eq!(db.load_snapshot(profile.id).unwrap().unwrap().work_seconds, 50);

        db.clear_snapshot(profile.id).unwrap();
        assert!(db.load_snapshot(profile.id).unwrap().is_none());
    }
}
