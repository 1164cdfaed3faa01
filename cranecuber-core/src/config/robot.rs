//! Robot calibration
//!
//! Constants of the mechanism itself, independent of the cube in it.
//! Sign conventions follow the motors:
//!
//! - Elevator: negative raises the cube
//! - Flipper: negative tips toward the camera, zero is the init position
//! - Turntable: positive is clockwise seen from above
//! - Squisher: positive closes the clamp

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Calibration of the robot's motors and gearing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RobotConfig {
    /// Flipper throw from init to the camera side
    pub flipper_degrees: i32,
    /// Flipper speed with the cube resting in the flipper
    pub flipper_speed: u16,
    /// Tilt used to let the cube slide back flush against the flipper wall
    pub flip_settle_degrees: i32,
    /// Turntable speed for every sub-move
    pub turntable_speed: u16,
    /// Turntable motor degrees per quarter turn of the cube
    pub turntable_quarter_turn_degrees: i32,
    /// Turntable gear reduction ×1000 (1:4.666)
    pub turntable_gear_ratio_x1000: u32,
    /// Squisher gear ratio ×1000 (1.8:1)
    pub squisher_gear_ratio_x1000: u32,
    /// Squisher speed while clamping
    pub squish_speed: u16,
    /// Signed speed for opening the squisher against its stop
    pub squisher_reset_speed: i16,
    /// Minimum displacement, in percent of the commanded one, before an
    /// elevator move counts as jammed
    pub jam_tolerance_percent: u8,
    /// Re-zero the squisher before every Nth move (0 disables)
    pub maintenance_interval: u16,
    /// Elevator motion timeout
    pub elevator_timeout_ms: u32,
    /// Flipper motion timeout
    pub flipper_timeout_ms: u32,
    /// Turntable and squisher-compensation timeout
    pub turntable_timeout_ms: u32,
    /// Squish clamp timeout
    pub squisher_timeout_ms: u32,
    /// Timeout for each run-until-stalled homing step
    pub homing_timeout_ms: u32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotConfig {
    /// Calibration of the reference build
    pub const fn new() -> Self {
        Self {
            flipper_degrees: -140,
            flipper_speed: 300,
            flip_settle_degrees: -60,
            turntable_speed: 1050,
            turntable_quarter_turn_degrees: 420,
            turntable_gear_ratio_x1000: 4666,
            squisher_gear_ratio_x1000: 1800,
            squish_speed: 400,
            squisher_reset_speed: -40,
            jam_tolerance_percent: 90,
            maintenance_interval: 25,
            elevator_timeout_ms: 3000,
            flipper_timeout_ms: 4000,
            turntable_timeout_ms: 2000,
            squisher_timeout_ms: 5000,
            homing_timeout_ms: 10_000,
        }
    }

    /// Flipper displacement below which a flip counts as jammed
    pub fn flip_jam_degrees(&self) -> u32 {
        self.flipper_degrees.unsigned_abs() / 2
    }

    /// Check values loaded from a configuration file
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.flipper_degrees == 0 {
            return Err(ConfigurationError::Calibration("flipper throw is zero"));
        }
        if self.flip_settle_degrees.unsigned_abs() >= self.flipper_degrees.unsigned_abs() {
            return Err(ConfigurationError::Calibration(
                "settle tilt must be smaller than the flipper throw",
            ));
        }
        if self.flipper_speed == 0 || self.turntable_speed == 0 || self.squish_speed == 0 {
            return Err(ConfigurationError::Calibration("motor speeds must be positive"));
        }
        if self.squisher_reset_speed == 0 {
            return Err(ConfigurationError::Calibration("squisher reset speed is zero"));
        }
        if self.turntable_quarter_turn_degrees <= 0 {
            return Err(ConfigurationError::Calibration(
                "quarter turn must be a positive number of degrees",
            ));
        }
        if self.turntable_gear_ratio_x1000 == 0 || self.squisher_gear_ratio_x1000 == 0 {
            return Err(ConfigurationError::Calibration("gear ratios must be positive"));
        }
        if self.jam_tolerance_percent == 0 || self.jam_tolerance_percent > 100 {
            return Err(ConfigurationError::Calibration(
                "jam tolerance must be within 1..=100 percent",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RobotConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.flip_jam_degrees(), 70);
    }

    #[test]
    fn test_rejects_zero_ratio() {
        let config = RobotConfig {
            squisher_gear_ratio_x1000: 0,
            ..RobotConfig::new()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_settle_past_throw() {
        let config = RobotConfig {
            flip_settle_degrees: -150,
            ..RobotConfig::new()
        };
        assert!(config.validate().is_err());
    }
}
