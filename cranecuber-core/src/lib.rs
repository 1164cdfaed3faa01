//! Board-agnostic core logic for the CraneCuber robot
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Cube geometry profiles and robot calibration
//! - Facing map tracking (which cube face sits in which direction)
//! - Primitive actuator sequencing with backlash compensation
//! - Repositioning plans and move translation
//! - Solution runner with periodic maintenance and cancellation
//! - Scan choreography and cube size detection
//! - Session state machine and jam detection

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod error;
pub mod motion;
pub mod moves;
pub mod orientation;
pub mod planner;
pub mod safety;
pub mod scan;
pub mod scheduler;
pub mod state;

#[cfg(test)]
mod testing;

pub use error::{Actuator, CollaboratorError, ConfigurationError, Error, Fault, MoveError};
