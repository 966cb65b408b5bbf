/// History command handler
use anyhow::Result;
use chrono::Local;
use tabled::{Table, Tabled};
use tempo_core::HistoryEntry;
use tempo_storage::{Database, Profile};

use super::helpers::format_duration;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

/// Render entries as a table, most recent first
pub fn render_history(entries: &[HistoryEntry]) -> String {
    let rows: Vec<HistoryRow> = entries
        .iter()
        .map(|entry| HistoryRow {
            when: entry
                .occurred_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            kind: entry.kind.to_string(),
            duration: format_duration(entry.duration_seconds),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn handle_history_command(
    db: &Database,
    profile: &Profile,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let entries: Vec<HistoryEntry> = db
        .get_time_records(profile.id, limit)?
        .into_iter()
        .map(HistoryEntry::from)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No sessions recorded for '{}' yet.", profile.name);
        return Ok(());
    }

    println!("\nHistory: {}", profile.name);
    println!("{}", render_history(&entries));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::SessionKind;

    #[test]
    fn test_render_history_lists_every_entry() {
        let entries = vec![
            HistoryEntry::new(SessionKind::Leisure, 62),
            HistoryEntry::new(SessionKind::Work, 125),
        ];
        let table = render_history(&entries);
        assert!(table.contains("leisure"));
        assert!(table.contains("1m 2s"));
        assert!(table.contains("work"));
        assert!(table.contains("2m 5s"));
        assert!(table.find("leisure") < table.find("work"));
    }
}
