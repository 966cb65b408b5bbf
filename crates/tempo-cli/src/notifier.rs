use tempo_core::{Notice, Notifier};

use crate::commands::helpers::format_duration;

/// Prints notices to the terminal
///
/// Transition messages follow the profile's notification toggle. Warnings and
/// failed saves are always shown.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    notifications: bool,
    sound: bool,
}

impl ConsoleNotifier {
    pub const fn new(notifications: bool, sound: bool) -> Self {
        Self {
            notifications,
            sound,
        }
    }

    /// Text for a notice, or `None` when it is muted
    fn message(&self, notice: &Notice) -> Option<String> {
        let text = match notice {
            Notice::Warning(err) => return Some(format!("! {err}")),
            Notice::SaveFailed { kind, message } => {
                return Some(format!("! Could not save {kind} session: {message}"));
            }
            _ if !self.notifications => return None,
            Notice::WorkStarted => "Work timer started".to_string(),
            Notice::WorkPaused => "Work timer paused".to_string(),
            Notice::WorkStopped {
                duration_seconds,
                earned_leisure,
            } => format!(
                "Work session saved: {}. You earned {} of leisure",
                format_duration(*duration_seconds),
                format_duration(*earned_leisure)
            ),
            Notice::LeisureStarted => "Leisure timer started".to_string(),
            Notice::LeisurePaused => "Leisure timer paused".to_string(),
            Notice::LeisureStopped { duration_seconds } if *duration_seconds > 0 => format!(
                "Leisure session saved: {}",
                format_duration(*duration_seconds)
            ),
            Notice::LeisureStopped { .. } => "Leisure timer stopped".to_string(),
            Notice::LeisureDepleted => "Leisure time is over. Back to work!".to_string(),
        };
        Some(text)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let Some(text) = self.message(notice) else {
            return;
        };
        if self.sound {
            print!("\x07");
        }
        println!("{text}");
    }
}
