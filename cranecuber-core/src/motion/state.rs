//! Robot pose

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Last confirmed pose of the mechanism
///
/// Only updated after a physical operation completed; a failed operation
/// leaves the previous values in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RobotPhysicalState {
    /// Rows of the cube raised into the turntable
    pub rows_elevated: u8,
    /// Flipper is at its initial (away from camera) position
    pub flipper_at_init: bool,
    /// Turntable encoder position, unbounded
    pub turntable_degrees: i32,
    /// Squisher drift since it was last zeroed
    pub squisher_degrees: i32,
}

impl Default for RobotPhysicalState {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotPhysicalState {
    /// Pose after homing
    pub const fn new() -> Self {
        Self {
            rows_elevated: 0,
            flipper_at_init: true,
            turntable_degrees: 0,
            squisher_degrees: 0,
        }
    }
}
