//! Configuration type definitions
//!
//! - [`GeometryProfile`]: per-cube-size calibration, immutable once chosen
//! - [`RobotConfig`]: calibration of the robot itself (gearing, speeds,
//!   tolerances), loaded from the machine configuration file

pub mod geometry;
pub mod robot;

pub use geometry::{GeometryProfile, MAX_CUBE_SIZE, MIN_CUBE_SIZE, SCAN_CUBE_SIZE};
pub use robot::RobotConfig;
