use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Which of the two timers a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Leisure,
}

impl SessionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Leisure => "leisure",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown session kind: {0}")]
pub struct ParseSessionKindError(String);

impl FromStr for SessionKind {
    type Err = ParseSessionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "leisure" => Ok(Self::Leisure),
            other => Err(ParseSessionKindError(other.to_string())),
        }
    }
}

/// Profile - the identity sessions and settings are scoped to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }
}

/// One completed timer session as stored in `time_records`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub kind: SessionKind,
    pub duration_seconds: u64,
    pub created_at: DateTime<Utc>,
}

impl TimeRecord {
    #[must_use]
    pub fn new(profile_id: Uuid, kind: SessionKind, duration_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_id,
            kind,
            duration_seconds,
            created_at: Utc::now(),
        }
    }
}

/// Per-profile preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub profile_id: Uuid,
    /// Show start/pause/stop notices
    pub notifications: bool,
    /// Ring the terminal bell with notices
    pub sound: bool,
    /// Share of work time credited as leisure, 0..=100 in steps of 10
    pub leisure_ratio_percent: u8,
}

impl ProfileSettings {
    pub const DEFAULT_RATIO_PERCENT: u8 = 50;

    #[must_use]
    pub fn default_for(profile_id: Uuid) -> Self {
        Self {
            profile_id,
            notifications: true,
            sound: true,
            leisure_ratio_percent: Self::DEFAULT_RATIO_PERCENT,
        }
    }

    /// Check that the ratio is a multiple of ten no larger than 100
    #[must_use]
    pub const fn is_valid_ratio(percent: u8) -> bool {
        percent <= 100 && percent % 10 == 0
    }
}

/// Saved timer counters, used to resume after a restart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub profile_id: Uuid,
    pub work_seconds: u64,
    pub leisure_seconds: u64,
    pub work_running: bool,
    pub leisure_running: bool,
    pub saved_at: DateTime<Utc>,
}
