//! ev3dev HAL for the CraneCuber robot
//!
//! Implements the `cranecuber-hal` traits for a LEGO EV3 brick running
//! ev3dev, where motors and sensors are exposed as sysfs attribute files:
//!
//! - `/sys/class/tacho-motor/motorN` for the four tacho motors
//! - `/sys/class/lego-sensor/sensorN` for the touch sensor
//!
//! Also provides emulated devices so the whole robot program can run on a
//! development host without hardware.

#![deny(unsafe_code)]

pub mod clock;
pub mod emulated;
pub mod port;
pub mod sysfs;
pub mod tacho;
pub mod touch;

pub use clock::SystemClock;
pub use emulated::{EmulatedMotor, EmulatedTouch};
pub use port::{InputPort, OutputPort};
pub use tacho::TachoMotor;
pub use touch::Ev3TouchSensor;
