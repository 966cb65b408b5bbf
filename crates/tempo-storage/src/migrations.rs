use anyhow::Result;
use rusqlite::Connection;

/// Initialize database schema
///
/// # Errors
///
/// Returns an error if database table creation or index creation fails
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Profiles table - who the timers belong to
    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Time records table - one row per stopped timer session
    conn.execute(
        "CREATE TABLE IF NOT EXISTS time_records (
            id TEXT PRIMARY KEY,
            profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            kind TEXT NOT NULL CHECK (kind IN ('work', 'leisure')),
            duration_seconds INTEGER NOT NULL CHECK (duration_seconds > 0),
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_time_records_profile_created
         ON time_records(profile_id, created_at)",
        [],
    )?;

    // Settings table - per-profile preferences
    conn.execute(
        "CREATE TABLE IF NOT EXISTS profile_settings (
            profile_id TEXT PRIMARY KEY REFERENCES profiles(id) ON DELETE CASCADE,
            notifications INTEGER NOT NULL DEFAULT 1,
            sound INTEGER NOT NULL DEFAULT 1,
            leisure_ratio_percent INTEGER NOT NULL DEFAULT 50
        )",
        [],
    )?;

    // Snapshot table - last saved counters per profile
    conn.execute(
        "CREATE TABLE IF NOT EXISTS timer_snapshots (
            profile_id TEXT PRIMARY KEY REFERENCES profiles(id) ON DELETE CASCADE,
            work_seconds INTEGER NOT NULL,
            leisure_seconds INTEGER NOT NULL,
            work_running INTEGER NOT NULL,
            leisure_running INTEGER NOT NULL,
            saved_at TEXT NOT NULL
        )",
        [],
    )?;

    log::debug!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('profiles', 'time_records', 'profile_settings', 'timer_snapshots')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_time_records_reject_zero_duration() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO profiles (id, name, created_at) VALUES ('p1', 'ana', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO time_records (id, profile_id, kind, duration_seconds, created_at)
             VALUES ('r1', 'p1', 'work', 0, '2024-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }
}
