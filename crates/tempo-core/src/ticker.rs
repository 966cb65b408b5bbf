use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Repeating callback on the tokio runtime, cancelled on drop.
///
/// The first call happens one period after spawning. The callback returns
/// `false` to end the task on its own.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn on the current runtime. Returns `None` outside of a runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Option<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let runtime = Handle::try_current().ok()?;
        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
            log::debug!("Ticker finished");
        });
        Some(Self { handle })
    }

    /// Whether the task is still scheduled
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
