//! CraneCuber Hardware Abstraction Layer
//!
//! This crate defines the capabilities the actuation engine drives. They
//! are implemented by platform crates (ev3dev sysfs, emulation, test rigs)
//! so the same engine code runs on the robot and on a development host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (cranecuber-robot)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cranecuber-core (engine)               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cranecuber-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cranecuber-hal-ev3dev (sysfs + emu)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`motor::Motor`] - Position-controlled tacho motor
//! - [`sensor::TouchSensor`] - Momentary push button
//! - [`clock::Clock`] - Monotonic millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod motor;
pub mod sensor;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use motor::{Motor, MotorError, Ramp, StopAction};
pub use sensor::{SensorError, TouchSensor};
