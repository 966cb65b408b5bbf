/// Interactive timer session
use anyhow::Result;
use chrono::Utc;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::Arc;
use tempo_core::config::AppConfig;
use tempo_core::{SessionController, SessionState, SessionStore};
use tempo_storage::{Database, Profile, TimerSnapshot};
use tokio::sync::mpsc;

use super::helpers::format_clock;
use super::history::render_history;
use crate::notifier::ConsoleNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Pause,
    Stop,
}

/// One line typed during `tempo run`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Work(TimerAction),
    Leisure(TimerAction),
    Status,
    History,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        let action = |word: &str| match word {
            "start" => Ok(TimerAction::Start),
            "pause" => Ok(TimerAction::Pause),
            "stop" => Ok(TimerAction::Stop),
            other => Err(format!("Unknown action '{other}'. Use start, pause or stop")),
        };

        match words.as_slice() {
            ["work", verb] => action(*verb).map(Self::Work),
            ["leisure", verb] => action(*verb).map(Self::Leisure),
            ["status"] => Ok(Self::Status),
            ["history"] => Ok(Self::History),
            ["help" | "?"] => Ok(Self::Help),
            ["quit" | "exit"] => Ok(Self::Quit),
            [] => Err("Type 'help' for the list of commands".to_string()),
            _ => Err(format!("Unknown command: {}", line.trim())),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  work start|pause|stop     control the work timer");
    println!("  leisure start|pause|stop  control the leisure timer");
    println!("  status                    show both timers");
    println!("  history                   show saved sessions");
    println!("  quit                      save the timers and exit");
}

fn print_status(state: &SessionState) {
    println!("Status:  {}", state.phase().description());
    println!("Work:    {}", format_clock(state.work_seconds()));
    println!("Leisure: {}", format_clock(state.leisure_seconds()));
}

/// Read stdin on a plain thread so a pending read never blocks runtime shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read from stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

async fn execute(controller: &SessionController, command: SessionCommand) {
    // Rejected transitions are already reported through the notifier
    match command {
        SessionCommand::Work(TimerAction::Start) => {
            let _ = controller.start_work();
        }
        SessionCommand::Work(TimerAction::Pause) => controller.pause_work(),
        SessionCommand::Work(TimerAction::Stop) => {
            controller.stop_work();
        }
        SessionCommand::Leisure(TimerAction::Start) => {
            let _ = controller.start_leisure();
        }
        SessionCommand::Leisure(TimerAction::Pause) => controller.pause_leisure(),
        SessionCommand::Leisure(TimerAction::Stop) => {
            controller.stop_leisure();
        }
        SessionCommand::Status => print_status(&controller.state()),
        SessionCommand::History => {
            controller.flush().await;
            match controller.list_sessions().await {
                Ok(entries) if entries.is_empty() => println!("No sessions recorded yet."),
                Ok(entries) => println!("{}", render_history(&entries)),
                Err(e) => println!("! Could not load history: {e}"),
            }
        }
        SessionCommand::Help => print_help(),
        SessionCommand::Quit => {}
    }
}

fn restore_snapshot(
    db: &Database,
    controller: &SessionController,
    profile: &Profile,
) -> Result<()> {
    let Some(snapshot) = db.load_snapshot(profile.id)? else {
        return Ok(());
    };
    if controller.restore(snapshot.work_seconds, snapshot.leisure_seconds) {
        println!(
            "Restored timers from {} (work {}, leisure {})",
            snapshot.saved_at.format("%Y-%m-%d %H:%M"),
            format_clock(snapshot.work_seconds),
            format_clock(snapshot.leisure_seconds)
        );
        if snapshot.work_running || snapshot.leisure_running {
            println!("Timers were running when the last session ended; they are paused now.");
        }
    }
    Ok(())
}

fn save_snapshot(
    db: &Database,
    profile: &Profile,
    before: &SessionState,
    after: &SessionState,
) -> Result<()> {
    if after.work_seconds() == 0 && after.leisure_seconds() == 0 {
        return db.clear_snapshot(profile.id);
    }
    db.save_snapshot(&TimerSnapshot {
        profile_id: profile.id,
        work_seconds: after.work_seconds(),
        leisure_seconds: after.leisure_seconds(),
        work_running: before.is_work_running(),
        leisure_running: before.is_leisure_running(),
        saved_at: Utc::now(),
    })
}

pub async fn handle_run_command(
    db: Arc<Database>,
    profile: &Profile,
    config: &AppConfig,
) -> Result<()> {
    let settings = db.get_profile_settings(profile.id)?;
    let notifier = Arc::new(ConsoleNotifier::new(settings.notifications, settings.sound));
    let store: Arc<dyn SessionStore> = db.clone();
    let controller = SessionController::new(
        store,
        notifier,
        config.timer_config(settings.leisure_ratio_percent),
    );
    controller.select_profile(Some(profile.id))?;

    if config.restore_snapshot {
        restore_snapshot(&db, &controller, profile)?;
    }

    println!("Session for '{}'. Type 'help' for commands.", profile.name);
    log::info!("Interactive session started for profile {}", profile.id);

    let mut lines = spawn_stdin_reader();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => execute(&controller, command).await,
                    Err(e) => println!("{e}"),
                }
            }
            result = &mut ctrl_c => {
                result?;
                println!();
                break;
            }
        }
    }

    let before = controller.state();
    let after = controller.shutdown().await;
    save_snapshot(&db, profile, &before, &after)?;
    print_status(&after);
    log::info!("Interactive session ended for profile {}", profile.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::TimerConfig;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "work start".parse::<SessionCommand>(),
            Ok(SessionCommand::Work(TimerAction::Start))
        );
        assert_eq!(
            "  Leisure   STOP ".parse::<SessionCommand>(),
            Ok(SessionCommand::Leisure(TimerAction::Stop))
        );
        assert_eq!("status".parse::<SessionCommand>(), Ok(SessionCommand::Status));
        assert_eq!("exit".parse::<SessionCommand>(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        assert!("work resume".parse::<SessionCommand>().is_err());
        assert!("nap".parse::<SessionCommand>().is_err());
        assert!("".parse::<SessionCommand>().is_err());
        assert!("work".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn test_snapshot_round_trip_through_controller() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let profile = db.create_profile("ana").unwrap();
        let store: Arc<dyn SessionStore> = db.clone();
        let notifier = Arc::new(ConsoleNotifier::new(false, false));

        let controller =
            SessionController::new(store.clone(), notifier.clone(), TimerConfig::manual());
        controller.select_profile(Some(profile.id)).unwrap();
        controller.start_work().unwrap();
        for _ in 0..40 {
            controller.tick();
        }
        let before = controller.state();
        controller.pause_work();
        let after = controller.state();
        save_snapshot(&db, &profile, &before, &after).unwrap();

        let saved = db.load_snapshot(profile.id).unwrap().unwrap();
        assert_eq!(saved.work_seconds, 40);
        assert!(saved.work_running);

        let resumed = SessionController::new(store, notifier, TimerConfig::manual());
        resumed.select_profile(Some(profile.id)).unwrap();
        restore_snapshot(&db, &resumed, &profile).unwrap();
        assert_eq!(resumed.state().work_seconds(), 40);
        assert!(!resumed.state().is_running());
    }

    #[test]
    fn test_empty_timers_clear_snapshot() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();
        let busy = SessionState::paused(10, 5);
        save_snapshot(&db, &profile, &busy, &busy).unwrap();
        assert!(db.load_snapshot(profile.id).unwrap().is_some());

        let empty = SessionState::new();
        save_snapshot(&db, &profile, &empty, &empty).unwrap();
        assert!(db.load_snapshot(profile.id).unwrap().is_none());
    }
}
