//! Scheduler abstraction consumed by gameplay components

use crate::handle::TimerHandle;
use std::time::Duration;

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnMut() + Send>;

/// Schedules deferred work on the game-update thread.
///
/// Components hold a `Weak<dyn Scheduler>` to the world's scheduler. A failed
/// upgrade means the world is gone and time-driven work must be skipped.
pub trait Scheduler: Send + Sync {
    /// Run `callback` once after `delay`
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Run `callback` after `initial_delay`, then every `interval` until cancelled.
    ///
    /// A zero `interval` is rejected and yields an inactive handle.
    fn schedule_repeating(
        &self,
        initial_delay: Duration,
        interval: Duration,
        callback: TimerCallback,
    ) -> TimerHandle;

    /// Cancel a timer. Returns false if it was not active.
    ///
    /// Once this returns, the callback will not run again.
    fn cancel(&self, handle: TimerHandle) -> bool;

    /// Check if a timer is still scheduled
    fn is_active(&self, handle: TimerHandle) -> bool;

    /// Current scheduler time
    fn now(&self) -> Duration;
}
