//! Database operations split into domain-specific modules.
//!
//! This module re-exports the main Database struct and all its operations.

mod helpers;
mod profiles;
mod settings;
mod snapshots;
mod time_records;

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::migrations;

/// Get the local data directory for tempo.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let mut path = dirs::data_local_dir().ok_or_else(|| anyhow!("Failed to get local data dir"))?;
    path.push("tempo");
    Ok(path)
}

/// Database connection wrapper
///
/// The connection sits behind a mutex so a single `Database` can be shared
/// between the timer controller and the tasks it spawns for history writes.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Create a new database connection
    ///
    /// # Errors
    ///
    /// Returns an error if database directory creation, connection opening, or schema initialization fails
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(path) => path,
            None => Self::default_db_path()?,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(&path).context("Failed to open database connection")?;
        migrations::init_schema(&conn)?;

        log::info!("Database initialized at: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if schema initialization fails
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        migrations::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get default database path
    ///
    /// # Errors
    ///
    /// Returns an error if the local data directory cannot be determined
    pub fn default_db_path() -> Result<PathBuf> {
        Ok(get_data_dir()?.join("tempo.db"))
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tempo.db");

        let db = Database::new(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert!(db.list_profiles().unwrap().is_empty());
    }

    #[test]
    fn test_default_path_lives_in_data_dir() {
        if let Ok(path) = Database::default_db_path() {
            assert!(path.ends_with("tempo/tempo.db"));
            assert_eq!(path.parent(), get_data_dir().ok().as_deref());
        }
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tempo.db");

        {
            let db = Database::new(Some(path.clone())).unwrap();
            db.create_profile("ana").unwrap();
        }

        let db = Database::new(Some(path)).unwrap();
        let profiles = db.list_profiles().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "ana");
    }
}
