//! Work/leisure session state machine
//!
//! Work counts up and is open-ended. Leisure is a budget earned from work
//! that counts down and stops by itself when it reaches zero. The two timers
//! never run at the same time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempo_storage::{SessionKind, TimeRecord};

use crate::error::TimerError;

/// Derived view of the two timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    Idle,
    WorkRunning,
    WorkPaused,
    LeisureRunning,
    LeisurePaused,
}

impl TimerPhase {
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::WorkRunning | Self::LeisureRunning)
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::WorkRunning => "Working",
            Self::WorkPaused => "Work paused",
            Self::LeisureRunning => "On leisure",
            Self::LeisurePaused => "Leisure paused",
        }
    }
}

/// Immutable record of one stopped timer session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: SessionKind,
    pub duration_seconds: u64,
    pub occurred_at: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(kind: SessionKind, duration_seconds: u64) -> Self {
        Self {
            kind,
            duration_seconds,
            occurred_at: Utc::now(),
        }
    }
}

impl From<TimeRecord> for HistoryEntry {
    fn from(record: TimeRecord) -> Self {
        Self {
            kind: record.kind,
            duration_seconds: record.duration_seconds,
            occurred_at: record.created_at,
        }
    }
}

/// Share of work time credited as leisure, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeisureRatio(u8);

impl LeisureRatio {
    /// Half of the work time, the standard reward
    pub const HALF: Self = Self(50);

    /// Build a ratio, capping at 100 %
    #[must_use]
    pub const fn from_percent(percent: u8) -> Self {
        if percent > 100 {
            Self(100)
        } else {
            Self(percent)
        }
    }

    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Leisure earned for `work_seconds`, rounded down
    #[must_use]
    pub const fn earned_for(&self, work_seconds: u64) -> u64 {
        let pct = self.0 as u64;
        // floor(w * p / 100) without overflowing on large w
        (work_seconds / 100) * pct + (work_seconds % 100) * pct / 100
    }
}

impl Default for LeisureRatio {
    fn default() -> Self {
        Self::HALF
    }
}

/// Work stop that produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedWork {
    pub duration_seconds: u64,
    pub earned_leisure: u64,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was running
    Idle,
    /// Work counter after the increment
    Work { elapsed: u64 },
    /// Leisure left after the decrement
    Leisure { remaining: u64 },
    /// Leisure reached zero and stopped
    LeisureDepleted,
}

impl TickOutcome {
    /// Whether a timer is still running after this tick
    #[must_use]
    pub const fn keeps_running(&self) -> bool {
        matches!(self, Self::Work { .. } | Self::Leisure { .. })
    }
}

/// Counters and run flags for the two timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    work_seconds: u64,
    leisure_seconds: u64,
    work_running: bool,
    leisure_running: bool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Both timers paused at the given counters
    #[must_use]
    pub const fn paused(work_seconds: u64, leisure_seconds: u64) -> Self {
        Self {
            work_seconds,
            leisure_seconds,
            work_running: false,
            leisure_running: false,
        }
    }

    #[must_use]
    pub const fn work_seconds(&self) -> u64 {
        self.work_seconds
    }

    #[must_use]
    pub const fn leisure_seconds(&self) -> u64 {
        self.leisure_seconds
    }

    #[must_use]
    pub const fn is_work_running(&self) -> bool {
        self.work_running
    }

    #[must_use]
    pub const fn is_leisure_running(&self) -> bool {
        self.leisure_running
    }

    /// Whether either timer needs ticks
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.work_running || self.leisure_running
    }

    #[must_use]
    pub const fn phase(&self) -> TimerPhase {
        if self.work_running {
            TimerPhase::WorkRunning
        } else if self.leisure_running {
            TimerPhase::LeisureRunning
        } else if self.work_seconds > 0 {
            TimerPhase::WorkPaused
        } else if self.leisure_seconds > 0 {
            TimerPhase::LeisurePaused
        } else {
            TimerPhase::Idle
        }
    }

    /// Start (or resume) the work timer.
    ///
    /// Returns `Ok(false)` when work was already running.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::LeisureRunning`] while leisure is being spent.
    pub fn start_work(&mut self) -> Result<bool, TimerError> {
        if self.leisure_running {
            return Err(TimerError::LeisureRunning);
        }
        if self.work_running {
            return Ok(false);
        }
        self.work_running = true;
        Ok(true)
    }

    /// Pause work, keeping the counter. Returns whether work was running.
    pub fn pause_work(&mut self) -> bool {
        std::mem::replace(&mut self.work_running, false)
    }

    /// Stop work and convert the elapsed time into leisure.
    ///
    /// Returns `None` when no work time had accumulated.
    pub fn stop_work(&mut self, ratio: LeisureRatio) -> Option<CompletedWork> {
        self.work_running = false;
        let duration_seconds = std::mem::take(&mut self.work_seconds);
        if duration_seconds == 0 {
            return None;
        }
        let earned_leisure = ratio.earned_for(duration_seconds);
        self.leisure_seconds = self.leisure_seconds.saturating_add(earned_leisure);
        Some(CompletedWork {
            duration_seconds,
            earned_leisure,
        })
    }

    /// Start (or resume) spending leisure.
    ///
    /// Returns `Ok(false)` when leisure was already running.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::WorkRunning`] while work is running and
    /// [`TimerError::NoLeisureBalance`] when there is nothing to spend.
    pub fn start_leisure(&mut self) -> Result<bool, TimerError> {
        if self.work_running {
            return Err(TimerError::WorkRunning);
        }
        if self.leisure_seconds == 0 {
            return Err(TimerError::NoLeisureBalance);
        }
        if self.leisure_running {
            return Ok(false);
        }
        self.leisure_running = true;
        Ok(true)
    }

    /// Pause leisure, keeping the balance. Returns whether leisure was running.
    pub fn pause_leisure(&mut self) -> bool {
        std::mem::replace(&mut self.leisure_running, false)
    }

    /// Stop leisure and forfeit the remaining balance.
    ///
    /// Returns the seconds to record, which is only the case when leisure was
    /// running with a positive balance.
    pub fn stop_leisure(&mut self) -> Option<u64> {
        let was_running = std::mem::replace(&mut self.leisure_running, false);
        let remaining = std::mem::take(&mut self.leisure_seconds);
        (was_running && remaining > 0).then_some(remaining)
    }

    /// Advance the running timer by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.work_running {
            self.work_seconds = self.work_seconds.saturating_add(1);
            return TickOutcome::Work {
                elapsed: self.work_seconds,
            };
        }
        if !self.leisure_running {
            return TickOutcome::Idle;
        }

        self.leisure_seconds = self.leisure_seconds.saturating_sub(1);
        if self.leisure_seconds == 0 {
            self.leisure_running = false;
            TickOutcome::LeisureDepleted
        } else {
            TickOutcome::Leisure {
                remaining: self.leisure_seconds,
            }
        }
    }
}
