/// Statistics and challenges command handlers
use anyhow::Result;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use tabled::{Table, Tabled};
use tempo_core::challenges::{self, Achievement, ChallengeProgress};
use tempo_core::stats::{self, DailyTotals};
use tempo_core::HistoryEntry;
use tempo_storage::{Database, Profile, TimeRecord};

use super::helpers::{format_duration, progress_bar};

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Work")]
    work: String,
    #[tabled(rename = "Leisure")]
    leisure: String,
}

impl From<&DailyTotals> for DayRow {
    fn from(day: &DailyTotals) -> Self {
        Self {
            date: day.date.format("%a %Y-%m-%d").to_string(),
            work: format!("{:.2}h", day.work_hours()),
            leisure: format!("{:.2}h", day.leisure_hours()),
        }
    }
}

#[derive(Tabled)]
struct ChallengeRow {
    #[tabled(rename = "Challenge")]
    title: &'static str,
    #[tabled(rename = "Goal")]
    description: &'static str,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Reward")]
    reward: &'static str,
}

impl From<&ChallengeProgress> for ChallengeRow {
    fn from(progress: &ChallengeProgress) -> Self {
        Self {
            title: progress.challenge.title(),
            description: progress.challenge.description(),
            progress: format!("{} {}%", progress_bar(progress.percent), progress.percent),
            reward: progress.challenge.reward(),
        }
    }
}

/// Achievements grid as one line of `[label]` slots
fn render_achievements(slots: &[Achievement]) -> String {
    slots
        .iter()
        .map(|slot| format!("[{}]", slot.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_entries(records: Vec<TimeRecord>) -> Vec<HistoryEntry> {
    records.into_iter().map(HistoryEntry::from).collect()
}

fn load_entries(db: &Database, profile: &Profile) -> Result<Vec<HistoryEntry>> {
    Ok(to_entries(db.get_time_records(profile.id, None)?))
}

/// Sessions from midnight UTC six days before `now` up to `now`
fn load_week(db: &Database, profile: &Profile, now: DateTime<Utc>) -> Result<Vec<HistoryEntry>> {
    let start = (now.date_naive() - Duration::days(6))
        .and_time(NaiveTime::default())
        .and_utc();
    Ok(to_entries(db.get_time_records_in_range(profile.id, start, now)?))
}

pub fn handle_stats_command(db: &Database, profile: &Profile) -> Result<()> {
    let now = Utc::now();
    let week = stats::weekly_breakdown(&load_week(db, profile, now)?, now.date_naive());
    let totals = stats::totals(&load_entries(db, profile)?);

    println!("\nLast 7 days: {}", profile.name);
    let rows: Vec<DayRow> = week.iter().map(DayRow::from).collect();
    println!("{}", Table::new(rows));

    println!(
        "\nTotal work:    {} ({} sessions)",
        format_duration(totals.work_seconds),
        totals.work_sessions
    );
    println!(
        "Total leisure: {} ({} sessions)",
        format_duration(totals.leisure_seconds),
        totals.leisure_sessions
    );
    Ok(())
}

pub fn handle_challenges_command(db: &Database, profile: &Profile) -> Result<()> {
    let entries = load_entries(db, profile)?;
    let progress = challenges::evaluate(&entries);

    println!("\nChallenges: {}", profile.name);
    let rows: Vec<ChallengeRow> = progress.iter().map(ChallengeRow::from).collect();
    println!("{}", Table::new(rows));

    let slots = challenges::achievements(&progress);
    let unlocked = slots.iter().filter(|slot| slot.unlocked).count();
    println!("\nAchievements ({unlocked} of {} unlocked)", slots.len());
    println!("{}", render_achievements(&slots));
    Ok(())
}
