use thiserror::Error;

/// A transition the controller refused to perform.
///
/// Rejections never touch the timer state; hosts show them as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("select a profile before starting a timer")]
    NoProfileSelected,

    #[error("leisure timer is running; pause or stop it first")]
    LeisureRunning,

    #[error("work timer is running; pause or stop it first")]
    WorkRunning,

    #[error("no leisure time available; work to earn some")]
    NoLeisureBalance,

    #[error("stop both timers before switching profiles")]
    ProfileInUse,
}
