//! Cube orientation tracking
//!
//! The robot frame has six fixed directions, with the camera looking at
//! the cube from the South. The cube faces move around inside that frame
//! as the robot rotates and flips it; [`FacingMap`] records where each
//! face currently is.

pub mod facing;
pub mod tracker;

pub use facing::{Direction, FaceLabel, FacingMap};
pub use tracker::OrientationTracker;
