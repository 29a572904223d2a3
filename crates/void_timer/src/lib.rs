//! Void Timer - Deferred and Repeating Work
//!
//! Gameplay components schedule time-driven work through the [`Scheduler`]
//! trait instead of a concrete engine service. The [`TimerManager`]
//! implementation only moves forward when the host loop calls
//! [`TimerManager::advance`], so the same type serves as the world clock and
//! as a deterministic fake clock in tests.
//!
//! # Example
//!
//! ```ignore
//! use void_timer::prelude::*;
//! use std::time::Duration;
//!
//! let timers = TimerManager::new();
//! let handle = timers.schedule_repeating(
//!     Duration::from_secs(3),
//!     Duration::from_secs(1),
//!     Box::new(|| println!("tick")),
//! );
//!
//! timers.advance(Duration::from_secs(4)); // fires twice
//! timers.cancel(handle);
//! ```

pub mod handle;
pub mod manager;
pub mod scheduler;

pub mod prelude {
    pub use crate::handle::TimerHandle;
    pub use crate::manager::TimerManager;
    pub use crate::scheduler::{Scheduler, TimerCallback};
    pub use crate::{no_world, world_ref};
}

pub use handle::TimerHandle;
pub use manager::TimerManager;
pub use scheduler::{Scheduler, TimerCallback};

use std::sync::{Arc, Weak};

/// Weak, type-erased reference to a world's scheduler.
///
/// Components keep this instead of an owning pointer so they can tell when
/// the world has been torn down.
pub fn world_ref<S: Scheduler + 'static>(scheduler: &Arc<S>) -> Weak<dyn Scheduler> {
    let scheduler: Arc<dyn Scheduler> = scheduler.clone();
    Arc::downgrade(&scheduler)
}

/// A world reference that never resolves
pub fn no_world() -> Weak<dyn Scheduler> {
    Weak::<TimerManager>::new()
}
