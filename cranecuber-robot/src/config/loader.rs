//! Configuration loading
//!
//! Reads `robot.toml` from disk when a path is given, otherwise uses the
//! copy compiled into the binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use cranecuber_core::config::{RobotConfig, MAX_CUBE_SIZE, MIN_CUBE_SIZE};
use cranecuber_core::ConfigurationError;
use cranecuber_hal_ev3dev::port::UnknownPort;
use cranecuber_hal_ev3dev::{InputPort, OutputPort};

/// Embedded default configuration
/// Edit robot.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../robot.toml");

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML syntax or type error
    #[error("invalid robot.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Calibration rejected by the engine
    #[error("invalid [motion] section: {0}")]
    Motion(#[from] ConfigurationError),
    /// Port name not recognised
    #[error("invalid [ports] section: {0}")]
    Port(#[from] UnknownPort),
    /// Value out of range
    #[error("{0}")]
    Invalid(String),
}

/// `[server]`: the vision/solver daemon
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for a response
    pub timeout_s: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: cranecuber_protocol::DEFAULT_PORT,
            timeout_s: 30,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

/// `[ports]`: where each device is plugged in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    pub elevator: String,
    pub flipper: String,
    pub turntable: String,
    pub squisher: String,
    pub touch: String,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            elevator: "A".to_string(),
            flipper: "B".to_string(),
            turntable: "C".to_string(),
            squisher: "D".to_string(),
            touch: "1".to_string(),
        }
    }
}

/// Parsed port assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ports {
    pub elevator: OutputPort,
    pub flipper: OutputPort,
    pub turntable: OutputPort,
    pub squisher: OutputPort,
    pub touch: InputPort,
}

impl PortConfig {
    /// Resolve port names, rejecting an output port used twice
    pub fn resolve(&self) -> Result<Ports, ConfigError> {
        let ports = Ports {
            elevator: self.elevator.parse()?,
            flipper: self.flipper.parse()?,
            turntable: self.turntable.parse()?,
            squisher: self.squisher.parse()?,
            touch: self.touch.parse()?,
        };

        let outputs = [ports.elevator, ports.flipper, ports.turntable, ports.squisher];
        for (i, port) in outputs.iter().enumerate() {
            if outputs[i + 1..].contains(port) {
                return Err(ConfigError::Invalid(format!("output port {} used twice", port)));
            }
        }
        Ok(ports)
    }
}

/// `[emulate]`: what the emulated camera and solver report
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmulateConfig {
    pub size: u8,
    pub solution: String,
}

impl Default for EmulateConfig {
    fn default() -> Self {
        Self {
            size: 3,
            solution: "F B2 R' D2 B R U D' R L' D' F' R2 D F2 B'".to_string(),
        }
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub motion: RobotConfig,
    pub ports: PortConfig,
    pub emulate: EmulateConfig,
}

impl AppConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.ports.resolve()?;

        if self.server.timeout_s == 0 {
            return Err(ConfigError::Invalid("[server] timeout_s must be positive".to_string()));
        }
        if !(MIN_CUBE_SIZE..=MAX_CUBE_SIZE).contains(&self.emulate.size) {
            return Err(ConfigError::Invalid(format!(
                "[emulate] size must be {}-{}",
                MIN_CUBE_SIZE, MAX_CUBE_SIZE
            )));
        }
        Ok(())
    }
}

/// Parse and validate configuration text
pub fn parse(text: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`, or the embedded default
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse(&text)?
        }
        None => {
            log::info!("Using embedded configuration");
            parse(EMBEDDED_CONFIG)?
        }
    };

    log_config_summary(&config);
    Ok(config)
}

fn log_config_summary(config: &AppConfig) {
    log::info!(
        "  daemon: {}:{} ({}s timeout)",
        config.server.host,
        config.server.port,
        config.server.timeout_s
    );
    log::info!(
        "  ports: elevator {}, flipper {}, turntable {}, squisher {}, touch {}",
        config.ports.elevator,
        config.ports.flipper,
        config.ports.turntable,
        config.ports.squisher,
        config.ports.touch
    );
    log::debug!("  motion: {:?}", config.motion);
}
