//! Manually advanced timer manager

use crate::handle::TimerHandle;
use crate::scheduler::{Scheduler, TimerCallback};
use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;

struct Timer {
    due: Duration,
    interval: Option<Duration>,
    /// Scheduling order, breaks ties between timers due at the same instant
    sequence: u64,
    /// Taken out while the callback runs
    callback: Option<TimerCallback>,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    timer: Option<Timer>,
}

#[derive(Default)]
struct TimerState {
    now: Duration,
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    next_sequence: u64,
}

impl TimerState {
    fn insert(&mut self, delay: Duration, interval: Option<Duration>, callback: TimerCallback) -> TimerHandle {
        let timer = Timer {
            due: self.now + delay,
            interval,
            sequence: self.next_sequence,
            callback: Some(callback),
        };
        self.next_sequence += 1;

        let index = match self.free_list.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.timer = Some(timer);
        TimerHandle::new(index, slot.generation)
    }

    fn slot(&self, handle: TimerHandle) -> Option<&Slot> {
        if handle.is_null() {
            return None;
        }
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation() && slot.timer.is_some())
    }

    fn remove(&mut self, handle: TimerHandle) -> Option<Timer> {
        self.slot(handle)?;
        let slot = &mut self.slots[handle.index() as usize];
        let timer = slot.timer.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index());
        timer
    }

    /// Earliest timer due at or before `target`
    fn next_due(&self, target: Duration) -> Option<TimerHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let timer = slot.timer.as_ref()?;
                (timer.callback.is_some() && timer.due <= target)
                    .then(|| (timer.due, timer.sequence, TimerHandle::new(index as u32, slot.generation)))
            })
            .min_by_key(|(due, sequence, _)| (*due, *sequence))
            .map(|(_, _, handle)| handle)
    }
}

/// Deterministic scheduler driven by the host's update loop.
///
/// Time only moves when [`TimerManager::advance`] is called, which makes the
/// manager usable both as the live world clock and as a fake clock in tests.
pub struct TimerManager {
    state: Mutex<TimerState>,
}

impl TimerManager {
    /// Create an empty manager at time zero
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TimerState::default()),
        }
    }

    /// Move the clock forward by `delta`, firing every timer that comes due.
    ///
    /// Timers fire in due-time order; a repeating timer fires once per elapsed
    /// interval. Returns the number of callbacks run.
    pub fn advance(&self, delta: Duration) -> usize {
        let target = self.state.lock().now + delta;
        let mut fired = 0;

        loop {
            let (handle, mut callback) = {
                let mut state = self.state.lock();
                let Some(handle) = state.next_due(target) else {
                    break;
                };
                let slot = &mut state.slots[handle.index() as usize];
                let Some(timer) = slot.timer.as_mut() else {
                    break;
                };
                let due = timer.due;
                let Some(callback) = timer.callback.take() else {
                    break;
                };
                if due > state.now {
                    state.now = due;
                }
                (handle, callback)
            };

            callback();
            fired += 1;

            let expired = {
                let mut state = self.state.lock();
                let interval = state
                    .slot(handle)
                    .and_then(|slot| slot.timer.as_ref())
                    .map(|timer| timer.interval);

                match interval {
                    Some(Some(interval)) => {
                        if let Some(timer) = state.slots[handle.index() as usize].timer.as_mut() {
                            timer.due += interval;
                            timer.callback = Some(callback);
                        }
                        None
                    }
                    // One-shot timer completed
                    Some(None) => Some((state.remove(handle), callback)),
                    // Cancelled while running
                    None => Some((None, callback)),
                }
            };
            drop(expired);
        }

        let mut state = self.state.lock();
        if target > state.now {
            state.now = target;
        }
        fired
    }

    /// Number of scheduled timers
    pub fn active_count(&self) -> usize {
        self.state
            .lock()
            .slots
            .iter()
            .filter(|slot| slot.timer.is_some())
            .count()
    }

    /// Cancel every timer
    pub fn clear(&self) {
        let handles: Vec<TimerHandle> = {
            let state = self.state.lock();
            state
                .slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.timer.is_some())
                .map(|(index, slot)| TimerHandle::new(index as u32, slot.generation))
                .collect()
        };
        for handle in handles {
            self.cancel(handle);
        }
    }
}

impl Scheduler for TimerManager {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = self.state.lock().insert(delay, None, callback);
        log::trace!("Scheduled one-shot timer {:?} in {:?}", handle, delay);
        handle
    }

    fn schedule_repeating(
        &self,
        initial_delay: Duration,
        interval: Duration,
        callback: TimerCallback,
    ) -> TimerHandle {
        if interval.is_zero() {
            log::warn!("Rejected repeating timer with zero interval");
            return TimerHandle::NULL;
        }
        let handle = self
            .state
            .lock()
            .insert(initial_delay, Some(interval), callback);
        log::trace!(
            "Scheduled repeating timer {:?} in {:?} every {:?}",
            handle,
            initial_delay,
            interval
        );
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        // Drop the timer (and its callback) outside the lock
        let removed = self.state.lock().remove(handle);
        removed.is_some()
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.state.lock().slot(handle).is_some()
    }

    fn now(&self) -> Duration {
        self.state.lock().now
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerManager")
            .field("now", &self.now())
            .field("active", &self.active_count())
            .finish()
    }
}
