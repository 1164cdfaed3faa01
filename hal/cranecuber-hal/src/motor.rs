//! Tacho motor abstraction
//!
//! Every actuator on the robot (elevator, flipper, turntable, squisher) is
//! a position-controlled servo motor with a built-in encoder. Positions and
//! speeds are in encoder degrees and degrees per second.
//!
//! Commands start a motion and return immediately, so that two motors can
//! move together; [`Motor::wait_until_stopped`] blocks until the motion has
//! finished or the timeout fired.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the motor does once a motion completes or is stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopAction {
    /// Remove power, let the motor spin freely
    #[default]
    Coast,
    /// Short the windings, stopping quickly without holding position
    Brake,
    /// Actively hold the current position
    Hold,
}

impl StopAction {
    /// Name used by the motor controller
    pub const fn as_str(self) -> &'static str {
        match self {
            StopAction::Coast => "coast",
            StopAction::Brake => "brake",
            StopAction::Hold => "hold",
        }
    }
}

/// Acceleration profile for a motion, as time to reach/leave full speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ramp {
    /// Milliseconds from standstill to full speed
    pub up_ms: u16,
    /// Milliseconds from full speed to standstill
    pub down_ms: u16,
}

impl Ramp {
    /// Step change in speed
    pub const NONE: Ramp = Ramp::new(0, 0);

    /// Create a ramp profile
    pub const fn new(up_ms: u16, down_ms: u16) -> Self {
        Self { up_ms, down_ms }
    }
}

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MotorError {
    /// Motion did not finish within the allotted time
    #[error("motion timed out")]
    Timeout,
    /// Motor not found on its port or unplugged
    #[error("motor disconnected")]
    Disconnected,
    /// Reading or writing a motor attribute failed
    #[error("motor I/O failed")]
    Io,
    /// Controller rejected the command or its parameters
    #[error("invalid motor command")]
    InvalidCommand,
}

/// Position-controlled motor
///
/// Sign conventions belong to the mechanism, not to this trait: the engine
/// documents which direction is "up" or "closed" for each actuator.
pub trait Motor {
    /// Current encoder position in degrees
    fn current_position(&mut self) -> Result<i32, MotorError>;

    /// Stop the motor and declare the current position to be zero
    fn reset_position(&mut self) -> Result<(), MotorError>;

    /// Start a move to an absolute encoder position
    fn move_to_absolute_position(
        &mut self,
        target: i32,
        speed: u16,
        ramp: Ramp,
        stop: StopAction,
    ) -> Result<(), MotorError>;

    /// Start a move by `delta` degrees from the current position
    fn move_relative(&mut self, delta: i32, speed: u16, stop: StopAction)
        -> Result<(), MotorError>;

    /// Run at `speed` (signed, degrees per second) until the motor stalls
    /// against a hard stop, then apply `stop`
    ///
    /// Blocks until stalled or `timeout_ms` elapsed.
    fn run_until_stalled(
        &mut self,
        speed: i16,
        stop: StopAction,
        timeout_ms: u32,
    ) -> Result<(), MotorError>;

    /// Block until the current motion has finished
    ///
    /// Returns [`MotorError::Timeout`] if the motor is still moving after
    /// `timeout_ms`.
    fn wait_until_stopped(&mut self, timeout_ms: u32) -> Result<(), MotorError>;

    /// Stop any motion and apply `action`
    fn stop(&mut self, action: StopAction) -> Result<(), MotorError>;
}

impl<M: Motor + ?Sized> Motor for &mut M {
    fn current_position(&mut self) -> Result<i32, MotorError> {
        (**self).current_position()
    }

    fn reset_position(&mut self) -> Result<(), MotorError> {
        (**self).reset_position()
    }

    fn move_to_absolute_position(
        &mut self,
        target: i32,
        speed: u16,
        ramp: Ramp,
        stop: StopAction,
    ) -> Result<(), MotorError> {
        (**self).move_to_absolute_position(target, speed, ramp, stop)
    }

    fn move_relative(
        &mut self,
        delta: i32,
        speed: u16,
        stop: StopAction,
    ) -> Result<(), MotorError> {
        (**self).move_relative(delta, speed, stop)
    }

    fn run_until_stalled(
        &mut self,
        speed: i16,
        stop: StopAction,
        timeout_ms: u32,
    ) -> Result<(), MotorError> {
        (**self).run_until_stalled(speed, stop, timeout_ms)
    }

    fn wait_until_stopped(&mut self, timeout_ms: u32) -> Result<(), MotorError> {
        (**self).wait_until_stopped(timeout_ms)
    }

    fn stop(&mut self, action: StopAction) -> Result<(), MotorError> {
        (**self).stop(action)
    }
}
