//! Error taxonomy
//!
//! Two kinds of failure reach the caller, and they are kept apart:
//!
//! - [`MoveError`]: a move that cannot be parsed or addressed. Checked
//!   before any motion, so the robot is untouched.
//! - [`Fault`]: a physical or programming fault during motion. Always
//!   fatal; the session must shut the robot down.
//!
//! Cooperative cancellation is not an error and is reported in the
//! outcome types of the runner and scanner instead.

use core::fmt;

use cranecuber_hal::MotorError;

use crate::orientation::FaceLabel;

/// The four actuators of the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Actuator {
    /// Raises rows of the cube into the turntable
    Elevator,
    /// Tips the cube over toward or away from the camera
    Flipper,
    /// Spins the elevated rows
    Turntable,
    /// Clamps the cube square inside the turntable
    Squisher,
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Actuator::Elevator => "elevator",
            Actuator::Flipper => "flipper",
            Actuator::Turntable => "turntable",
            Actuator::Squisher => "squisher",
        })
    }
}

/// A move token that cannot be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// Token was empty
    #[error("empty move token")]
    Empty,
    /// Token names a face that does not exist
    #[error("unknown face '{0}'")]
    UnknownFace(char),
    /// Token does not follow the move grammar
    #[error("malformed move token")]
    Malformed,
    /// Layer depth cannot be addressed on this cube size
    #[error("{rows} layers of {face} cannot be turned on a {size}x{size}x{size} cube")]
    Unsupported { face: FaceLabel, rows: u8, size: u8 },
    /// Move list exceeds the fixed capacity
    #[error("move list is too long")]
    TooManyMoves,
}

/// Requested operation is outside what the profile or robot supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Row count outside `0..=size`
    #[error("cannot elevate {rows} rows of a {size}-row cube")]
    RowsOutOfRange { rows: u8, size: u8 },
    /// Rotation must be one or two quarter turns
    #[error("{0} quarter turns requested, expected 1 or 2")]
    QuarterTurnsOutOfRange(u8),
    /// No geometry profile exists for this cube size
    #[error("{0}x{0}x{0} cubes are not supported")]
    UnsupportedCubeSize(u8),
    /// Scanned square count does not describe a cube
    #[error("{0} squares do not form a supported cube")]
    SquareCount(usize),
    /// Operation requires the elevator to be empty
    #[error("operation requires no elevated rows, found {0}")]
    RowsElevated(u8),
    /// Calibration value rejected
    #[error("invalid calibration: {0}")]
    Calibration(&'static str),
}

/// External collaborator the session depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Camera capture of a face failed
    #[error("face scan unavailable")]
    ScanUnavailable,
    /// Color resolution or solving failed
    #[error("solver unavailable")]
    SolverUnavailable,
}

/// Fatal fault; the robot must be shut down
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// Measured displacement fell short of the commanded one
    #[error("cube jammed on {axis}: moved {moved} of {expected} degrees")]
    CubeJammed {
        axis: Actuator,
        moved: u32,
        expected: u32,
    },
    /// Motor command failed
    #[error("{actuator} motor: {error}")]
    Motor {
        actuator: Actuator,
        error: MotorError,
    },
    /// Operation outside the supported range
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Facing map disagrees with the repositioning plan
    #[error("expected {expected} on top after repositioning, found {actual}")]
    InvariantViolation {
        expected: FaceLabel,
        actual: FaceLabel,
    },
    /// Camera or solver failure
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl Fault {
    /// Wrap a motor error for `actuator`
    pub fn motor(actuator: Actuator) -> impl Fn(MotorError) -> Fault {
        move |error| Fault::Motor { actuator, error }
    }
}

/// Any failure of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Rejected before motion
    #[error(transparent)]
    Move(#[from] MoveError),
    /// Fatal fault during motion
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Fault(Fault::Configuration(e))
    }
}

impl Error {
    /// Check if this error requires an orderly shutdown of the robot
    pub fn is_fatal_fault(&self) -> bool {
        matches!(self, Error::Fault(_))
    }
}
