//! Per-primitive timing

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Milliseconds spent in each primitive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingStats {
    pub elevate_ms: u64,
    pub flip_ms: u64,
    pub rotate_ms: u64,
    pub squish_ms: u64,
}

impl TimingStats {
    /// Time in all primitives
    pub fn total_ms(&self) -> u64 {
        self.elevate_ms + self.flip_ms + self.rotate_ms + self.squish_ms
    }

    /// Clear all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TimingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}s in elevate, {}s in flip, {}s in rotate, {}s in squish",
            self.elevate_ms / 1000,
            self.flip_ms / 1000,
            self.rotate_ms / 1000,
            self.squish_ms / 1000
        )
    }
}
