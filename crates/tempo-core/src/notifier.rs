use tempo_storage::SessionKind;

use crate::error::TimerError;

/// User-facing event raised by the controller.
///
/// Hosts decide the wording; the controller only says what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    WorkStarted,
    WorkPaused,
    WorkStopped {
        duration_seconds: u64,
        earned_leisure: u64,
    },
    LeisureStarted,
    LeisurePaused,
    LeisureStopped {
        /// Seconds recorded as spent, zero when nothing was running
        duration_seconds: u64,
    },
    LeisureDepleted,
    Warning(TimerError),
    SaveFailed {
        kind: SessionKind,
        message: String,
    },
}

/// Sink for toast-style messages
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Warning(err) => log::warn!("{err}"),
            Notice::SaveFailed { kind, message } => {
                log::error!("Could not save {kind} session: {message}");
            }
            other => log::info!("{other:?}"),
        }
    }
}
