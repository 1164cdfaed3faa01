//! Application errors

use std::io;

use cranecuber_core::state::ErrorKind;
use cranecuber_core::{Actuator, ConfigurationError, Error, Fault, MoveError};
use cranecuber_hal::MotorError;
use cranecuber_hal_ev3dev::touch::TouchReadError;
use cranecuber_hal_ev3dev::OutputPort;
use cranecuber_protocol::FrameError;

use crate::config::ConfigError;

/// Anything that ends the program with a failure
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Motor missing from its port
    #[error("{actuator} motor on {port}: {error}")]
    MotorOpen {
        actuator: Actuator,
        port: OutputPort,
        error: MotorError,
    },
    #[error(transparent)]
    Touch(#[from] TouchReadError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("daemon request: {0}")]
    Protocol(#[from] FrameError),
    #[error("daemon did not answer within {0}s")]
    Timeout(u64),
    /// Daemon answered with an `ERROR` response
    #[error("daemon: {0}")]
    Daemon(String),
    #[error("malformed daemon reply: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] Error),
    /// Session stopped in an error state without a recorded cause
    #[error("session failed: {0}")]
    Session(ErrorKind),
}

impl From<Fault> for AppError {
    fn from(e: Fault) -> Self {
        AppError::Engine(e.into())
    }
}

impl From<MoveError> for AppError {
    fn from(e: MoveError) -> Self {
        AppError::Engine(e.into())
    }
}

impl From<ConfigurationError> for AppError {
    fn from(e: ConfigurationError) -> Self {
        AppError::Engine(e.into())
    }
}

impl AppError {
    /// Category reported to the session state machine
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Configuration,
            AppError::MotorOpen { .. } | AppError::Touch(_) => ErrorKind::MotorFault,
            AppError::Engine(e) => e.into(),
            AppError::Session(kind) => *kind,
            AppError::Io(_)
            | AppError::Protocol(_)
            | AppError::Timeout(_)
            | AppError::Daemon(_)
            | AppError::Json(_) => ErrorKind::SolverUnavailable,
        }
    }
}
