//! Test rigs built on the emulated HAL

use cranecuber_hal_ev3dev::{EmulatedMotor, SystemClock};

use crate::config::{GeometryProfile, RobotConfig};
use crate::motion::{ActuatorSequencer, Actuators};

pub type TestSequencer = ActuatorSequencer<EmulatedMotor, SystemClock>;

pub fn emulated_actuators() -> Actuators<EmulatedMotor> {
    Actuators {
        elevator: EmulatedMotor::new("elevator"),
        flipper: EmulatedMotor::new("flipper"),
        turntable: EmulatedMotor::new("turntable"),
        squisher: EmulatedMotor::new("squisher"),
    }
}

/// Homed sequencer for a cube of `size`
pub fn sequencer(size: u8) -> TestSequencer {
    let profile = GeometryProfile::for_size(size).expect("supported size");
    ActuatorSequencer::new(emulated_actuators(), SystemClock::new(), profile, RobotConfig::new())
}

/// Homed sequencer with custom calibration
pub fn sequencer_with(size: u8, config: RobotConfig) -> TestSequencer {
    let profile = GeometryProfile::for_size(size).expect("supported size");
    ActuatorSequencer::new(emulated_actuators(), SystemClock::new(), profile, config)
}
