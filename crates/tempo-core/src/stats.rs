//! Per-day work/leisure totals for the statistics view

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tempo_storage::SessionKind;

use crate::session::HistoryEntry;

/// Work and leisure seconds of one UTC day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub work_seconds: u64,
    pub leisure_seconds: u64,
}

impl DailyTotals {
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            work_seconds: 0,
            leisure_seconds: 0,
        }
    }

    fn accumulate(&mut self, entry: &HistoryEntry) {
        match entry.kind {
            SessionKind::Work => {
                self.work_seconds = self.work_seconds.saturating_add(entry.duration_seconds);
            }
            SessionKind::Leisure => {
                self.leisure_seconds = self.leisure_seconds.saturating_add(entry.duration_seconds);
            }
        }
    }

    #[must_use]
    pub fn work_hours(&self) -> f64 {
        to_hours(self.work_seconds)
    }

    #[must_use]
    pub fn leisure_hours(&self) -> f64 {
        to_hours(self.leisure_seconds)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.work_seconds > 0 || self.leisure_seconds > 0
    }
}

/// Whole-history sums
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub work_seconds: u64,
    pub leisure_seconds: u64,
    pub work_sessions: usize,
    pub leisure_sessions: usize,
}

/// Seconds to hours, rounded to two decimals
#[allow(clippy::cast_precision_loss)]
fn to_hours(seconds: u64) -> f64 {
    (seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

/// Group entries by the UTC day they occurred on
#[must_use]
pub fn daily_totals(entries: &[HistoryEntry]) -> BTreeMap<NaiveDate, DailyTotals> {
    let mut days = BTreeMap::new();
    for entry in entries {
        let date = entry.occurred_at.date_naive();
        days.entry(date)
            .or_insert_with(|| DailyTotals::empty(date))
            .accumulate(entry);
    }
    days
}

/// The seven days ending with `today`, oldest first, empty days included
#[must_use]
pub fn weekly_breakdown(entries: &[HistoryEntry], today: NaiveDate) -> Vec<DailyTotals> {
    let days = daily_totals(entries);
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            days.get(&date)
                .copied()
                .unwrap_or_else(|| DailyTotals::empty(date))
        })
        .collect()
}

#[must_use]
pub fn totals(entries: &[HistoryEntry]) -> Totals {
    entries.iter().fold(Totals::default(), |mut acc, entry| {
        match entry.kind {
            SessionKind::Work => {
                acc.work_seconds = acc.work_seconds.saturating_add(entry.duration_seconds);
                acc.work_sessions += 1;
            }
            SessionKind::Leisure => {
                acc.leisure_seconds = acc.leisure_seconds.saturating_add(entry.duration_seconds);
                acc.leisure_sessions += 1;
            }
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(kind: SessionKind, secs: u64, day: u32, hour: u32) -> HistoryEntry {
        HistoryEntry {
            kind,
            duration_seconds: secs,
            occurred_at: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_weekly_breakdown_covers_seven_days_oldest_first() {
        let entries = vec![
            entry(SessionKind::Work, 3600, 10, 9),
            entry(SessionKind::Work, 1800, 10, 14),
            entry(SessionKind::Leisure, 900, 10, 16),
            entry(SessionKind::Work, 7200, 7, 9),
            // Outside the window
            entry(SessionKind::Work, 7200, 1, 9),
        ];

        let week = weekly_breakdown(&entries, date(10));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(4));
        assert_eq!(week[6].date, date(10));

        assert_eq!(week[6].work_seconds, 5400);
        assert_eq!(week[6].leisure_seconds, 900);
        assert_eq!(week[3].work_seconds, 7200);
        assert!(!week[0].is_active());
        assert_eq!(week.iter().map(|d| d.work_seconds).sum::<u64>(), 12600);
    }

    #[test]
    fn test_hours_rounded_to_two_decimals() {
        let day = DailyTotals {
            date: date(1),
            work_seconds: 5400,
            leisure_seconds: 100,
        };
        assert!((day.work_hours() - 1.5).abs() < f64::EPSILON);
        assert!((day.leisure_hours() - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals() {
        let entries = vec![
            entry(SessionKind::Work, 125, 1, 9),
            entry(SessionKind::Work, 75, 2, 9),
            entry(SessionKind::Leisure, 62, 2, 10),
        ];
        let totals = totals(&entries);
        assert_eq!(totals.work_seconds, 200);
        assert_eq!(totals.leisure_seconds, 62);
        assert_eq!(totals.work_sessions, 2);
        assert_eq!(totals.leisure_sessions, 1);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let entries = vec![
            entry(SessionKind::Work, u64::MAX, 3, 9),
            entry(SessionKind::Work, 10, 3, 10),
            entry(SessionKind::Leisure, u64::MAX, 3, 11),
            entry(SessionKind::Leisure, 10, 4, 11),
        ];
        let days = daily_totals(&entries);
        assert_eq!(days[&date(3)].work_seconds, u64::MAX);
        assert_eq!(days[&date(3)].leisure_seconds, u64::MAX);

        let totals = totals(&entries);
        assert_eq!(totals.work_seconds, u64::MAX);
        assert_eq!(totals.leisure_seconds, u64::MAX);
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(totals(&[]), Totals::default());
        assert!(weekly_breakdown(&[], date(10)).iter().all(|d| !d.is_active()));
    }
}
