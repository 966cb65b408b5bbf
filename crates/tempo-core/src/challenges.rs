//! Challenge progress derived from session history

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::session::HistoryEntry;
use crate::stats::{daily_totals, DailyTotals};

const FOCUS_TARGET_SECONDS: u64 = 4 * 3600;
const BALANCE_TARGET_DAYS: u64 = 5;
const STREAK_TARGET_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    /// Four hours of work in a single day
    FocusMaster,
    /// Five days where leisure stays between a quarter and half of work
    Balancer,
    /// Seven consecutive days with at least one session
    Marathoner,
}

impl Challenge {
    pub const ALL: [Self; 3] = [Self::FocusMaster, Self::Balancer, Self::Marathoner];

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::FocusMaster => "Focus Master",
            Self::Balancer => "Balancer",
            Self::Marathoner => "Marathoner",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FocusMaster => "Complete 4 hours of work in one day",
            Self::Balancer => "Keep a healthy work/leisure balance on 5 days",
            Self::Marathoner => "Use the timer 7 days in a row",
        }
    }

    #[must_use]
    pub const fn reward(&self) -> &'static str {
        match self {
            Self::FocusMaster => "Golden trophy",
            Self::Balancer => "Gold star",
            Self::Marathoner => "Consistency badge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeProgress {
    pub challenge: Challenge,
    /// 0..=100
    pub percent: u8,
}

impl ChallengeProgress {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.percent >= 100
    }
}

/// One slot of the achievements grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub challenge: Challenge,
    pub unlocked: bool,
}

impl Achievement {
    /// The reward once unlocked, a placeholder before
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.unlocked {
            self.challenge.reward()
        } else {
            "?"
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn percent_of(value: u64, target: u64) -> u8 {
    (value.saturating_mul(100) / target).min(100) as u8
}

fn is_balanced(day: &DailyTotals) -> bool {
    day.work_seconds > 0
        && day.leisure_seconds.saturating_mul(4) >= day.work_seconds
        && day.leisure_seconds.saturating_mul(2) <= day.work_seconds
}

fn longest_streak(days: &BTreeMap<NaiveDate, DailyTotals>) -> u64 {
    let mut best = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in days.keys() {
        current = match previous {
            Some(prev) if *date - prev == Duration::days(1) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        previous = Some(*date);
    }
    best
}

/// Progress of every challenge, in [`Challenge::ALL`] order
#[must_use]
pub fn evaluate(entries: &[HistoryEntry]) -> Vec<ChallengeProgress> {
    let days = daily_totals(entries);

    Challenge::ALL
        .iter()
        .map(|&challenge| {
            let percent = match challenge {
                Challenge::FocusMaster => {
                    let best = days.values().map(|d| d.work_seconds).max().unwrap_or(0);
                    percent_of(best, FOCUS_TARGET_SECONDS)
                }
                Challenge::Balancer => {
                    let balanced = days.values().filter(|d| is_balanced(d)).count() as u64;
                    percent_of(balanced, BALANCE_TARGET_DAYS)
                }
                Challenge::Marathoner => percent_of(longest_streak(&days), STREAK_TARGET_DAYS),
            };
            ChallengeProgress { challenge, percent }
        })
        .collect()
}

/// Achievement slots in [`Challenge::ALL`] order, unlocked ones first
#[must_use]
pub fn achievements(progress: &[ChallengeProgress]) -> Vec<Achievement> {
    let mut slots: Vec<Achievement> = Challenge::ALL
        .iter()
        .map(|&challenge| Achievement {
            challenge,
            unlocked: progress
                .iter()
                .any(|p| p.challenge == challenge && p.is_complete()),
        })
        .collect();
    slots.sort_by_key(|slot| !slot.unlocked);
    slots
}
