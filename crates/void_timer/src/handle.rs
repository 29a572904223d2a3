//! Generational timer handles
//!
//! A handle names one scheduled timer. Cancelling or completing the timer
//! bumps its slot generation, so a stale handle can never reach a timer
//! that later reuses the same slot.

use std::fmt;

/// Handle to a scheduled timer
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    index: u32,
    generation: u32,
}

impl TimerHandle {
    /// A handle that never refers to a live timer
    pub const NULL: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Check if this handle is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.index == u32::MAX
    }

    /// Slot index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation at the time the timer was scheduled
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "TimerHandle(null)")
        } else {
            write!(f, "TimerHandle({}v{})", self.index, self.generation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle() {
        assert!(TimerHandle::NULL.is_null());
        assert!(TimerHandle::default().is_null());
        assert!(!TimerHandle::new(0, 0).is_null());
        assert_eq!(format!("{:?}", TimerHandle::new(3, 2)), "TimerHandle(3v2)");
    }
}
