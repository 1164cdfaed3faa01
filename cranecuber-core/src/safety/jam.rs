//! Jam detection
//!
//! A motion is jammed when the measured displacement falls short of the
//! commanded one. The motor reports "stopped" in either case, so this is
//! the only way to tell a finished move from a blocked one.

use crate::error::{Actuator, Fault};

/// Result of a displacement check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JamCheck {
    /// Moved far enough
    Ok,
    /// Moved less than required
    Jammed { moved: u32, expected: u32 },
}

impl JamCheck {
    /// Convert to a fault for `axis`
    pub fn into_fault(self, axis: Actuator) -> Option<Fault> {
        match self {
            JamCheck::Ok => None,
            JamCheck::Jammed { moved, expected } => Some(Fault::CubeJammed {
                axis,
                moved,
                expected,
            }),
        }
    }
}

/// Displacement checker with a fixed tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JamDetector {
    /// Require at least this percentage of the commanded travel
    Percent(u8),
    /// Require at least this many degrees regardless of the target
    Degrees(u32),
}

impl JamDetector {
    /// Compare a move from `start` toward `target` that ended at `actual`
    pub fn check(&self, start: i32, target: i32, actual: i32) -> JamCheck {
        let moved = actual.abs_diff(start);
        let expected = target.abs_diff(start);
        let ok = match *self {
            JamDetector::Percent(percent) => {
                moved as u64 * 100 >= expected as u64 * percent as u64
            }
            JamDetector::Degrees(minimum) => moved >= minimum,
        };
        if ok {
            JamCheck::Ok
        } else {
            JamCheck::Jammed { moved, expected }
        }
    }
}
