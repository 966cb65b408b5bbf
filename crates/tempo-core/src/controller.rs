//! Session Timer Controller
//!
//! Owns the [`SessionState`] for the selected profile, schedules the
//! one-second tick while a timer runs, reports transitions to a [`Notifier`]
//! and hands completed sessions to a [`SessionStore`] without waiting for the
//! write to finish.

use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tempo_storage::SessionKind;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::TimerError;
use crate::notifier::{Notice, Notifier};
use crate::session::{HistoryEntry, LeisureRatio, SessionState, TickOutcome, TimerPhase};
use crate::store::SessionStore;
use crate::ticker::Ticker;

/// One tick advances the running timer by exactly this much
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    /// Spawn a ticker while a timer runs. When off, the host calls
    /// [`SessionController::tick`] itself.
    pub auto_tick: bool,
    pub leisure_ratio: LeisureRatio,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            auto_tick: true,
            leisure_ratio: LeisureRatio::HALF,
        }
    }
}

impl TimerConfig {
    /// Ticks driven by the host, for deterministic clocks
    #[must_use]
    pub fn manual() -> Self {
        Self {
            auto_tick: false,
            ..Self::default()
        }
    }
}

/// Handle to a timer controller; clones share the same timers.
///
/// The tick task is cancelled when the last handle is dropped.
#[derive(Clone)]
pub struct SessionController {
    shared: Arc<Shared>,
}

struct Shared {
    inner: Mutex<Inner>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    config: TimerConfig,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    profile_id: Option<Uuid>,
    /// Sessions completed by this controller, most recent first
    history: Vec<HistoryEntry>,
    ticker: Option<Ticker>,
    /// Bumped whenever the tick task is replaced or cancelled
    tick_generation: u64,
    pending_writes: Vec<JoinHandle<()>>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        config: TimerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                store,
                notifier,
                config,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notice: &Notice) {
        self.shared.notifier.notify(notice);
    }

    #[must_use]
    pub fn config(&self) -> &TimerConfig {
        &self.shared.config
    }

    /// Choose whose sessions are recorded from now on.
    ///
    /// # Errors
    ///
    /// Rejected while a timer runs or either counter holds time, so one
    /// profile's work is never recorded or spent under another.
    pub fn select_profile(&self, profile_id: Option<Uuid>) -> Result<(), TimerError> {
        let switched = {
            let mut inner = self.lock();
            let state = inner.state;
            let idle = !state.is_running() && state.work_seconds() == 0 && state.leisure_seconds() == 0;
            if inner.profile_id == profile_id {
                return Ok(());
            }
            if idle {
                inner.profile_id = profile_id;
            }
            idle
        };

        if !switched {
            return Err(self.reject(TimerError::ProfileInUse));
        }
        match profile_id {
            Some(id) => log::info!("Selected profile {id}"),
            None => log::info!("Profile cleared"),
        }
        Ok(())
    }

    #[must_use]
    pub fn profile_id(&self) -> Option<Uuid> {
        self.lock().profile_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.lock().state.phase()
    }

    /// Sessions completed by this controller, most recent first
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().history.clone()
    }

    /// Whether a tick task is currently scheduled
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.lock().ticker.as_ref().is_some_and(Ticker::is_active)
    }

    /// Replace the counters with saved values, both timers paused.
    ///
    /// Refused while a timer runs.
    pub fn restore(&self, work_seconds: u64, leisure_seconds: u64) -> bool {
        let mut inner = self.lock();
        if inner.state.is_running() {
            log::warn!("Not restoring counters while a timer is running");
            return false;
        }
        inner.state = SessionState::paused(work_seconds, leisure_seconds);
        log::info!("Restored counters (work: {work_seconds}s, leisure: {leisure_seconds}s)");
        true
    }

    /// # Errors
    ///
    /// Rejected without a selected profile or while leisure runs.
    pub fn start_work(&self) -> Result<(), TimerError> {
        let result = {
            let mut inner = self.lock();
            let result = if inner.profile_id.is_none() {
                Err(TimerError::NoProfileSelected)
            } else {
                inner.state.start_work()
            };
            if matches!(result, Ok(true)) {
                self.sync_ticker(&mut inner);
            }
            result
        };

        match result {
            Ok(started) => {
                if started {
                    log::info!("Work timer started");
                    self.notify(&Notice::WorkStarted);
                }
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    pub fn pause_work(&self) {
        let paused = {
            let mut inner = self.lock();
            let paused = inner.state.pause_work();
            self.sync_ticker(&mut inner);
            paused
        };
        if paused {
            log::info!("Work timer paused");
            self.notify(&Notice::WorkPaused);
        }
    }

    /// Stop work, crediting leisure. Returns the recorded entry, if any.
    pub fn stop_work(&self) -> Option<HistoryEntry> {
        let (completed, failure) = {
            let mut inner = self.lock();
            let completed = inner.state.stop_work(self.shared.config.leisure_ratio);
            self.sync_ticker(&mut inner);
            match completed {
                Some(work) => {
                    let (entry, failure) =
                        self.complete(&mut inner, SessionKind::Work, work.duration_seconds);
                    (Some((work, entry)), failure)
                }
                None => (None, None),
            }
        };

        let entry = completed.map(|(work, entry)| {
            log::info!(
                "Work timer stopped after {}s, earned {}s of leisure",
                work.duration_seconds,
                work.earned_leisure
            );
            self.notify(&Notice::WorkStopped {
                duration_seconds: work.duration_seconds,
                earned_leisure: work.earned_leisure,
            });
            entry
        });
        if let Some(notice) = failure {
            self.notify(&notice);
        }
        entry
    }

    /// # Errors
    ///
    /// Rejected without a selected profile, while work runs, or with no
    /// leisure balance. The state is left untouched.
    pub fn start_leisure(&self) -> Result<(), TimerError> {
        let result = {
            let mut inner = self.lock();
            let result = if inner.profile_id.is_none() {
                Err(TimerError::NoProfileSelected)
            } else {
                inner.state.start_leisure()
            };
            if matches!(result, Ok(true)) {
                self.sync_ticker(&mut inner);
            }
            result
        };

        match result {
            Ok(started) => {
                if started {
                    log::info!("Leisure timer started");
                    self.notify(&Notice::LeisureStarted);
                }
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    pub fn pause_leisure(&self) {
        let paused = {
            let mut inner = self.lock();
            let paused = inner.state.pause_leisure();
            self.sync_ticker(&mut inner);
            paused
        };
        if paused {
            log::info!("Leisure timer paused");
            self.notify(&Notice::LeisurePaused);
        }
    }

    /// Stop leisure and drop the remaining balance.
    ///
    /// Only a running leisure timer with time left produces an entry.
    pub fn stop_leisure(&self) -> Option<HistoryEntry> {
        let (had_leisure, entry, failure) = {
            let mut inner = self.lock();
            let had_leisure =
                inner.state.is_leisure_running() || inner.state.leisure_seconds() > 0;
            let spent = inner.state.stop_leisure();
            self.sync_ticker(&mut inner);
            match spent {
                Some(seconds) => {
                    let (entry, failure) = self.complete(&mut inner, SessionKind::Leisure, seconds);
                    (had_leisure, Some(entry), failure)
                }
                None => (had_leisure, None, None),
            }
        };

        if had_leisure {
            let duration_seconds = entry.as_ref().map_or(0, |e| e.duration_seconds);
            log::info!("Leisure timer stopped after {duration_seconds}s");
            self.notify(&Notice::LeisureStopped { duration_seconds });
        }
        if let Some(notice) = failure {
            self.notify(&notice);
        }
        entry
    }

    /// Advance the running timer by one second
    pub fn tick(&self) -> TickOutcome {
        let outcome = {
            let mut inner = self.lock();
            self.advance(&mut inner)
        };
        self.report_tick(outcome);
        outcome
    }

    /// Tick from a scheduled task; stale tasks from an earlier run are ignored
    fn scheduled_tick(&self, generation: u64) -> bool {
        let outcome = {
            let mut inner = self.lock();
            if inner.tick_generation != generation {
                return false;
            }
            self.advance(&mut inner)
        };
        self.report_tick(outcome);
        outcome.keeps_running()
    }

    fn advance(&self, inner: &mut Inner) -> TickOutcome {
        let outcome = inner.state.tick();
        if !outcome.keeps_running() {
            self.sync_ticker(inner);
        }
        outcome
    }

    fn report_tick(&self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Work { elapsed } => log::debug!("Work tick: {elapsed}s"),
            TickOutcome::Leisure { remaining } => log::debug!("Leisure tick: {remaining}s left"),
            TickOutcome::LeisureDepleted => {
                log::info!("Leisure time used up");
                self.notify(&Notice::LeisureDepleted);
            }
            TickOutcome::Idle => {}
        }
    }

    /// Wait for every history write started so far
    pub async fn flush(&self) {
        let pending = {
            let mut inner = self.lock();
            std::mem::take(&mut inner.pending_writes)
        };
        for handle in pending {
            if let Err(e) = handle.await {
                log::error!("History write task failed: {e}");
            }
        }
    }

    /// Pause both timers, cancel the tick and wait for pending writes.
    ///
    /// Returns the final counters so the host can save them.
    pub async fn shutdown(&self) -> SessionState {
        let state = {
            let mut inner = self.lock();
            inner.state.pause_work();
            inner.state.pause_leisure();
            self.sync_ticker(&mut inner);
            inner.state
        };
        self.flush().await;
        log::info!(
            "Controller shut down (work: {}s, leisure: {}s)",
            state.work_seconds(),
            state.leisure_seconds()
        );
        state
    }

    /// Stored sessions of the selected profile, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error without a selected profile or if the store query fails
    pub async fn list_sessions(&self) -> Result<Vec<HistoryEntry>> {
        let profile_id = self.profile_id().ok_or(TimerError::NoProfileSelected)?;
        self.shared.store.list_sessions(profile_id).await
    }

    fn reject(&self, err: TimerError) -> TimerError {
        log::warn!("Rejected timer transition: {err}");
        self.notify(&Notice::Warning(err));
        err
    }

    /// Log the entry locally and start its write
    fn complete(
        &self,
        inner: &mut Inner,
        kind: SessionKind,
        duration_seconds: u64,
    ) -> (HistoryEntry, Option<Notice>) {
        let entry = HistoryEntry::new(kind, duration_seconds);
        inner.history.insert(0, entry.clone());
        let failure = self.dispatch_write(inner, &entry);
        (entry, failure)
    }

    /// Spawn the store write. Returns a notice when it cannot even start.
    fn dispatch_write(&self, inner: &mut Inner, entry: &HistoryEntry) -> Option<Notice> {
        inner.pending_writes.retain(|handle| !handle.is_finished());
        let kind = entry.kind;
        let duration_seconds = entry.duration_seconds;

        let Some(profile_id) = inner.profile_id else {
            log::warn!("No profile selected; {kind} session of {duration_seconds}s not saved");
            return Some(Notice::SaveFailed {
                kind,
                message: TimerError::NoProfileSelected.to_string(),
            });
        };
        let Ok(runtime) = Handle::try_current() else {
            log::error!("No async runtime; {kind} session of {duration_seconds}s not saved");
            return Some(Notice::SaveFailed {
                kind,
                message: "no async runtime available".to_string(),
            });
        };

        let store = Arc::clone(&self.shared.store);
        let notifier = Arc::clone(&self.shared.notifier);
        inner.pending_writes.push(runtime.spawn(async move {
            match store.record_session(profile_id, kind, duration_seconds).await {
                Ok(()) => log::info!(
                    "Recorded {kind} session of {duration_seconds}s for profile {profile_id}"
                ),
                Err(e) => {
                    log::error!("Failed to record {kind} session: {e:#}");
                    notifier.notify(&Notice::SaveFailed {
                        kind,
                        message: format!("{e:#}"),
                    });
                }
            }
        }));
        None
    }

    /// Keep exactly one tick task alive while a timer runs, none otherwise
    fn sync_ticker(&self, inner: &mut Inner) {
        if !inner.state.is_running() {
            if let Some(ticker) = inner.ticker.take() {
                inner.tick_generation += 1;
                ticker.cancel();
                log::debug!("Tick source cancelled");
            }
            return;
        }
        if !self.shared.config.auto_tick || inner.ticker.as_ref().is_some_and(Ticker::is_active) {
            return;
        }

        inner.tick_generation += 1;
        let generation = inner.tick_generation;
        let shared = Arc::downgrade(&self.shared);
        inner.ticker = Ticker::spawn(TICK_PERIOD, move || {
            shared
                .upgrade()
                .is_some_and(|shared| SessionController { shared }.scheduled_tick(generation))
        });
        if inner.ticker.is_none() {
            log::warn!("No async runtime; timer must be ticked by the host");
        }
    }
}
