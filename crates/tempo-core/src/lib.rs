pub mod challenges;
pub mod config;
pub mod controller;
pub mod error;
pub mod notifier;
pub mod session;
pub mod stats;
pub mod store;
pub mod ticker;

pub use controller::{SessionController, TimerConfig, TICK_PERIOD};
pub use error::TimerError;
pub use notifier::{LogNotifier, Notice, Notifier};
pub use session::{HistoryEntry, LeisureRatio, SessionState, TickOutcome, TimerPhase};
pub use store::{MemoryStore, SessionStore};
pub use tempo_storage::SessionKind;
