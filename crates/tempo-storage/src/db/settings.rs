use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::helpers::parse_uuid;
use super::Database;
use crate::models::ProfileSettings;

impl Database {
    // ==================== Settings Methods ====================

    /// Get or create settings for a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or defaults cannot be stored
    pub fn get_profile_settings(&self, profile_id: Uuid) -> Result<ProfileSettings> {
        let result = self
            .conn()?
            .query_row(
                "SELECT profile_id, notifications, sound, leisure_ratio_percent
                 FROM profile_settings WHERE profile_id = ?1",
                params![profile_id.to_string()],
                |row| {
                    Ok(ProfileSettings {
                        profile_id: parse_uuid(0, &row.get::<_, String>(0)?)?,
                        notifications: row.get::<_, i32>(1)? != 0,
                        sound: row.get::<_, i32>(2)? != 0,
                        leisure_ratio_percent: row.get(3)?,
                    })
                },
            )
            .optional()?;

        if let Some(settings) = result {
            Ok(settings)
        } else {
            // Create default settings
            let settings = ProfileSettings::default_for(profile_id);
            self.update_profile_settings(&settings)?;
            Ok(settings)
        }
    }

    /// Update settings
    ///
    /// # Errors
    ///
    /// Returns an error if the ratio is out of range or the database operation fails
    pub fn update_profile_settings(&self, settings: &ProfileSettings) -> Result<()> {
        if !ProfileSettings::is_valid_ratio(settings.leisure_ratio_percent) {
            bail!(
                "Leisure ratio must be a multiple of 10 between 0 and 100, got {}",
                settings.leisure_ratio_percent
            );
        }
        self.conn()?.execute(
            "INSERT INTO profile_settings (profile_id, notifications, sound, leisure_ratio_percent)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(profile_id) DO UPDATE SET
                notifications = excluded.notifications,
                sound = excluded.sound,
                leisure_ratio_percent = excluded.leisure_ratio_percent",
            params![
                settings.profile_id.to_string(),
                i32::from(settings.notifications),
                i32::from(settings.sound),
                settings.leisure_ratio_percent,
            ],
        )?;
        log::info!("Saved settings for profile {}", settings.profile_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_created_on_first_read() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();

        let settings = db.get_profile_settings(profile.id).unwrap();
        assert_eq!(settings, ProfileSettings::default_for(profile.id));
    }

    #[test]
    fn test_update_settings() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();

        let mut settings = db.get_profile_settings(profile.id).unwrap();
        settings.sound = false;
        settings.leisure_ratio_percent = 30;
        db.update_profile_settings(&settings).unwrap();

        let reloaded = db.get_profile_settings(profile.id).unwrap();
        assert!(!reloaded.sound);
        assert!(reloaded.notifications);
        assert_eq!(reloaded.leisure_ratio_percent, 30);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();

        let mut settings = ProfileSettings::default_for(profile.id);
        settings.leisure_ratio_percent = 45;
        assert!(db.update_profile_settings(&settings).is_err());
    }
}
