//! Configuration loading and parsing
//!
//! Loads `robot.toml` from `--config` or the embedded default. Parsed with
//! `toml` + `serde`; motion calibration deserializes straight into the
//! engine's `RobotConfig`.

pub mod loader;

pub use loader::{load, ConfigError, EmulateConfig, ServerConfig};
