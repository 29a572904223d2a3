//! Delayed, repeating health regeneration

use std::time::Duration;
use void_timer::{Scheduler, TimerCallback, TimerHandle};

/// Regeneration timing, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegenerationSchedule {
    /// Health restored by each tick
    pub heal_amount_per_tick: f32,
    /// Time between ticks
    pub tick_interval: Duration,
    /// Time from the last hit to the first tick
    pub initial_delay: Duration,
}

/// A restartable regeneration timer.
///
/// Holds at most one live schedule; starting again replaces it.
#[derive(Debug, Default)]
pub struct RegenerationTimer {
    handle: Option<TimerHandle>,
}

impl RegenerationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any previous schedule, then run `callback` after the initial
    /// delay and every tick interval afterwards.
    pub fn start(
        &mut self,
        scheduler: &dyn Scheduler,
        schedule: &RegenerationSchedule,
        callback: TimerCallback,
    ) {
        self.cancel(scheduler);
        let handle =
            scheduler.schedule_repeating(schedule.initial_delay, schedule.tick_interval, callback);
        if scheduler.is_active(handle) {
            self.handle = Some(handle);
        }
    }

    /// Stop the schedule. Safe to call when not running.
    pub fn cancel(&mut self, scheduler: &dyn Scheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }

    /// Check if a schedule is live on `scheduler`
    pub fn is_running(&self, scheduler: &dyn Scheduler) -> bool {
        self.handle
            .map(|handle| scheduler.is_active(handle))
            .unwrap_or(false)
    }

    /// Forget the handle without touching a scheduler (used once the world is gone)
    pub fn reset(&mut self) {
        self.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use void_timer::TimerManager;

    fn schedule() -> RegenerationSchedule {
        RegenerationSchedule {
            heal_amount_per_tick: 1.0,
            tick_interval: Duration::from_secs(1),
            initial_delay: Duration::from_secs(2),
        }
    }

    fn counting(counter: &Arc<AtomicU32>) -> TimerCallback {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let timers = TimerManager::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));
        let mut timer = RegenerationTimer::new();

        timer.start(&timers, &schedule(), counting(&first));
        timers.advance(Duration::from_secs(1));
        timer.start(&timers, &schedule(), counting(&second));
        assert_eq!(timers.active_count(), 1);

        timers.advance(Duration::from_secs(3));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 2);
        assert!(timer.is_running(&timers));
    }

    #[test]
    fn test_cancel_idempotent() {
        let timers = TimerManager::new();
        let counter = Arc::new(AtomicU32::new(0));
        let mut timer = RegenerationTimer::new();

        timer.cancel(&timers);
        timer.start(&timers, &schedule(), counting(&counter));
        timer.cancel(&timers);
        timer.cancel(&timers);

        assert!(!timer.is_running(&timers));
        timers.advance(Duration::from_secs(10));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
