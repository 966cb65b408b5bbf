/// Per-profile settings command handler
use anyhow::Result;
use tempo_storage::{Database, Profile, ProfileSettings};

/// Requested changes; `None` leaves a value as it is
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub notifications: Option<bool>,
    pub sound: Option<bool>,
    pub ratio: Option<u8>,
}

impl SettingsUpdate {
    const fn is_empty(&self) -> bool {
        self.notifications.is_none() && self.sound.is_none() && self.ratio.is_none()
    }

    fn apply(&self, settings: &mut ProfileSettings) {
        if let Some(notifications) = self.notifications {
            settings.notifications = notifications;
        }
        if let Some(sound) = self.sound {
            settings.sound = sound;
        }
        if let Some(ratio) = self.ratio {
            settings.leisure_ratio_percent = ratio;
        }
    }
}

const fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn print_settings(profile: &Profile, settings: &ProfileSettings) {
    println!("\nSettings: {}", profile.name);
    println!("  Notifications: {}", on_off(settings.notifications));
    println!("  Sound:         {}", on_off(settings.sound));
    println!(
        "  Leisure ratio: {}% of work time",
        settings.leisure_ratio_percent
    );
}

pub fn handle_settings_command(
    db: &Database,
    profile: &Profile,
    update: &SettingsUpdate,
) -> Result<()> {
    let mut settings = db.get_profile_settings(profile.id)?;

    if !update.is_empty() {
        update.apply(&mut settings);
        db.update_profile_settings(&settings)?;
        println!("Settings updated.");
    }

    print_settings(profile, &settings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_persists_only_given_values() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();

        let update = SettingsUpdate {
            sound: Some(false),
            ratio: Some(30),
            ..SettingsUpdate::default()
        };
        handle_settings_command(&db, &profile, &update).unwrap();

        let settings = db.get_profile_settings(profile.id).unwrap();
        assert!(settings.notifications);
        assert!(!settings.sound);
        assert_eq!(settings.leisure_ratio_percent, 30);
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();

        handle_settings_command(&db, &profile, &SettingsUpdate::default()).unwrap();
        assert_eq!(
            db.get_profile_settings(profile.id).unwrap(),
            ProfileSettings::default_for(profile.id)
        );
    }
}
