use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::helpers::{fmt_datetime, parse_datetime, parse_uuid};
use super::Database;
use crate::models::Profile;

impl Database {
    /// Create a profile with a unique, non-empty name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, already taken, or the insert fails
    pub fn create_profile(&self, name: &str) -> Result<Profile> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Profile name cannot be empty");
        }
        if self.get_profile_by_name(name)?.is_some() {
            bail!("Profile '{name}' already exists");
        }

        let profile = Profile::new(name.to_string());
        self.conn()?.execute(
            "INSERT INTO profiles (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                profile.id.to_string(),
                profile.name,
                fmt_datetime(&profile.created_at),
            ],
        )?;
        log::info!("Created profile: {} ({})", profile.name, profile.id);
        Ok(profile)
    }

    /// List all profiles ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM profiles ORDER BY name COLLATE NOCASE")?;
        let profiles = stmt
            .query_map([], Self::row_to_profile)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// Get a profile by name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_profile_by_name(&self, name: &str) -> Result<Option<Profile>> {
        let profile = self
            .conn()?
            .query_row(
                "SELECT id, name, created_at FROM profiles WHERE name = ?1 COLLATE NOCASE",
                params![name.trim()],
                Self::row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }

    /// Delete a profile together with its records, settings and snapshot
    ///
    /// Returns `false` when no such profile exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn delete_profile(&self, id: Uuid) -> Result<bool> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM profiles WHERE id = ?1", params![id.to_string()])?;
        if deleted > 0 {
            log::info!("Deleted profile: {id}");
        }
        Ok(deleted > 0)
    }

    fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
        Ok(Profile {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            name: row.get(1)?,
            created_at: parse_datetime(2, &row.get::<_, String>(2)?)?,
        })
    }
}
