//! Emulated devices
//!
//! Used by `--emulate` runs and by engine tests. An emulated motor reaches
//! every commanded position instantly; hard stops found by
//! `run_until_stalled` are wherever the motor currently is.
//!
//! Motion shortfalls can be queued to rehearse jam handling: the next
//! absolute move then only covers the given percentage of its travel.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cranecuber_hal::{Motor, MotorError, Ramp, StopAction};
use embedded_hal::digital::{ErrorType, InputPin};

/// Motor that completes every motion instantly
#[derive(Debug, Clone, Default)]
pub struct EmulatedMotor {
    name: &'static str,
    position: i32,
    /// Motion commands issued (absolute, relative, run-until-stalled)
    motions: usize,
    /// Percent of travel achieved by upcoming absolute moves
    shortfalls: VecDeque<u8>,
}

impl EmulatedMotor {
    /// Create an emulated motor at position zero
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Current position without going through the [`Motor`] trait
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Number of motion commands issued so far
    pub fn motion_count(&self) -> usize {
        self.motions
    }

    /// Make the next absolute move stop after `percent` of its travel
    ///
    /// Calls queue up: each queued shortfall applies to one move.
    pub fn inject_shortfall(&mut self, percent: u8) {
        self.shortfalls.push_back(percent.min(100));
    }
}

impl Motor for EmulatedMotor {
    fn current_position(&mut self) -> Result<i32, MotorError> {
        Ok(self.position)
    }

    fn reset_position(&mut self) -> Result<(), MotorError> {
        self.position = 0;
        Ok(())
    }

    fn move_to_absolute_position(
        &mut self,
        target: i32,
        speed: u16,
        _ramp: Ramp,
        _stop: StopAction,
    ) -> Result<(), MotorError> {
        if speed == 0 {
            return Err(MotorError::InvalidCommand);
        }
        self.motions += 1;
        let travel = target - self.position;
        match self.shortfalls.pop_front() {
            Some(percent) => {
                let reached = self.position + travel * percent as i32 / 100;
                log::debug!("{}: short move to {} of {}", self.name, reached, target);
                self.position = reached;
            }
            None => self.position = target,
        }
        Ok(())
    }

    fn move_relative(
        &mut self,
        delta: i32,
        speed: u16,
        _stop: StopAction,
    ) -> Result<(), MotorError> {
        if speed == 0 {
            return Err(MotorError::InvalidCommand);
        }
        self.motions += 1;
        self.position += delta;
        Ok(())
    }

    fn run_until_stalled(
        &mut self,
        _speed: i16,
        _stop: StopAction,
        _timeout_ms: u32,
    ) -> Result<(), MotorError> {
        self.motions += 1;
        Ok(())
    }

    fn wait_until_stopped(&mut self, _timeout_ms: u32) -> Result<(), MotorError> {
        Ok(())
    }

    fn stop(&mut self, _action: StopAction) -> Result<(), MotorError> {
        Ok(())
    }
}

/// Touch sensor pressed programmatically
///
/// Clones share the same button, so a test or a keyboard handler can hold
/// one clone while the watcher polls another.
#[derive(Debug, Clone, Default)]
pub struct EmulatedTouch {
    pressed: Arc<AtomicBool>,
}

impl EmulatedTouch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the button down or release it
    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::SeqCst);
    }
}

impl ErrorType for EmulatedTouch {
    type Error = Infallible;
}

impl InputPin for EmulatedTouch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.load(Ordering::SeqCst))
    }
}
