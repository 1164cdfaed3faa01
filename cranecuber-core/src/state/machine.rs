//! State machine definition

use core::fmt;

use super::events::Event;
use crate::error::{CollaboratorError, Error, Fault};

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Loading configuration, opening motors
    Boot,
    /// Finding the hard stops of every actuator
    Homing,
    /// Waiting for the operator to press the touch sensor
    AwaitingStart,
    /// Showing each face to the camera
    Scanning,
    /// Waiting for colors, cube state and solution
    Resolving,
    /// Executing the move list
    Solving,
    /// Returning to the rest pose
    Parking,
    /// Cube solved, robot parked
    Complete,
    /// Lowering the elevator and releasing every motor
    ShuttingDown,
    /// Fatal fault; the robot must be shut down
    Error(ErrorKind),
}

/// Fault categories reported to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Elevator or flipper fell short of its target
    CubeJammed,
    /// A motor command failed
    MotorFault,
    /// Move list addresses layers the robot cannot turn
    UnsupportedMove,
    /// Calibration or profile error
    Configuration,
    /// Facing map disagrees with a plan
    InvariantViolation,
    /// Camera capture failed
    ScanUnavailable,
    /// Color resolution or solving failed
    SolverUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::CubeJammed => "cube jammed",
            ErrorKind::MotorFault => "motor fault",
            ErrorKind::UnsupportedMove => "unsupported move",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::InvariantViolation => "orientation invariant violated",
            ErrorKind::ScanUnavailable => "face scan unavailable",
            ErrorKind::SolverUnavailable => "solver unavailable",
        })
    }
}

impl From<&Fault> for ErrorKind {
    fn from(fault: &Fault) -> Self {
        match fault {
            Fault::CubeJammed { .. } => ErrorKind::CubeJammed,
            Fault::Motor { .. } => ErrorKind::MotorFault,
            Fault::Configuration(_) => ErrorKind::Configuration,
            Fault::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Fault::Collaborator(CollaboratorError::ScanUnavailable) => ErrorKind::ScanUnavailable,
            Fault::Collaborator(CollaboratorError::SolverUnavailable) => {
                ErrorKind::SolverUnavailable
            }
        }
    }
}

impl From<&Error> for ErrorKind {
    fn from(error: &Error) -> Self {
        match error {
            Error::Move(_) => ErrorKind::UnsupportedMove,
            Error::Fault(fault) => fault.into(),
        }
    }
}

impl State {
    /// Check if actuators may move in this state
    pub fn motion_allowed(&self) -> bool {
        matches!(
            self,
            State::Homing
                | State::Scanning
                | State::Solving
                | State::Parking
                | State::ShuttingDown
        )
    }

    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, State::Error(_))
    }

    /// Check if the session has nothing left to do
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Complete | State::ShuttingDown | State::Error(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Boot, BootComplete) => Homing,
            (Homing, HomingComplete) => AwaitingStart,
            (AwaitingStart, StartPressed) => Scanning,
            (Scanning, ScanComplete) => Resolving,
            (Resolving, StateResolved) => Solving,
            (Solving, SolveComplete) => Parking,
            (Parking, ParkComplete) => Complete,
            (Complete, NextCube) => AwaitingStart,

            // Faults win over everything but an orderly shutdown
            (ShuttingDown, _) => self,
            (Error(_), AcknowledgeError) => Homing,
            (Error(_), ShutdownRequested) => ShuttingDown,
            (Error(_), _) => self,
            (_, ErrorDetected(kind)) => Error(kind),
            (_, ShutdownRequested) => ShuttingDown,

            // Default: stay in current state
            _ => self,
        }
    }
}
