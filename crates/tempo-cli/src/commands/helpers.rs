//! Helper utility functions for CLI commands

use anyhow::{Context, Result};
use tempo_core::config::AppConfig;
use tempo_storage::{Database, Profile, ProfileSettings};

/// Format seconds as a `HH:MM:SS` clock
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Format seconds as a short human duration such as `1h 2m 5s`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Fixed-width ASCII progress bar, e.g. `[#####-----]`
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 10;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

/// Parse an on/off switch given on the command line
pub fn parse_toggle(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected 'on' or 'off', got '{other}'")),
    }
}

/// Parse a leisure ratio percentage (0-100 in steps of 10)
pub fn parse_ratio(value: &str) -> Result<u8, String> {
    let percent: u8 = value
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{value}' is not a percentage"))?;
    if ProfileSettings::is_valid_ratio(percent) {
        Ok(percent)
    } else {
        Err("ratio must be between 0 and 100 in steps of 10".to_string())
    }
}

/// Find the profile named on the command line, falling back to `default_profile`
pub fn resolve_profile(db: &Database, name: Option<&str>, config: &AppConfig) -> Result<Profile> {
    let name = name
        .or(config.default_profile.as_deref())
        .context("No profile given. Use --profile <name> or set default_profile in config.toml")?;

    db.get_profile_by_name(name)?.with_context(|| {
        format!("Profile not found: {name}. Run 'tempo profile add {name}' to create it.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(3725), "01:02:05");
        assert_eq!(format_clock(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3600), "1h 0m 0s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "[----------]");
        assert_eq!(progress_bar(75), "[#######---]");
        assert_eq!(progress_bar(100), "[##########]");
        assert_eq!(progress_bar(200), "[##########]");
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(parse_toggle("on"), Ok(true));
        assert_eq!(parse_toggle("OFF"), Ok(false));
        assert!(parse_toggle("maybe").is_err());
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_ratio("30"), Ok(30));
        assert_eq!(parse_ratio("50%"), Ok(50));
        assert!(parse_ratio("35").is_err());
        assert!(parse_ratio("110").is_err());
        assert!(parse_ratio("half").is_err());
    }

    #[test]
    fn test_resolve_profile() {
        let db = Database::open_in_memory().unwrap();
        let ana = db.create_profile("ana").unwrap();

        let config = AppConfig::default();
        assert_eq!(resolve_profile(&db, Some("ana"), &config).unwrap().id, ana.id);
        assert!(resolve_profile(&db, Some("bob"), &config).is_err());
        assert!(resolve_profile(&db, None, &config).is_err());

        let config = AppConfig {
            default_profile: Some("ana".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(resolve_profile(&db, None, &config).unwrap().id, ana.id);
    }
}
