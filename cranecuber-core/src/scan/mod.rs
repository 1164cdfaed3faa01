//! Scanning
//!
//! - [`choreography`]: show each face to the camera in turn
//! - [`size`]: infer the cube size from the scanned square count

pub mod choreography;
pub mod size;

pub use choreography::{scan, FaceCamera, ScanOutcome, SCAN_ORDER};
pub use size::detect_size;
