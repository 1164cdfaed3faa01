//! Solution execution
//!
//! Runs a parsed move list on the robot, with periodic maintenance and
//! cooperative cancellation, and parks the robot at the end.

pub mod runner;

pub use runner::{RunReport, SolutionRunner};
