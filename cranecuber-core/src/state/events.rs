//! Events that trigger state transitions

use super::machine::ErrorKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle events
    /// Configuration loaded and motors found
    BootComplete,
    /// Every actuator found its hard stop
    HomingComplete,

    // Operator events
    /// Touch sensor pressed while waiting
    StartPressed,
    /// Operator loaded the next cube
    NextCube,
    /// Signal or touch sensor asked the session to stop
    ShutdownRequested,
    /// Operator cleared a fault
    AcknowledgeError,

    // Progress events
    /// Six faces captured
    ScanComplete,
    /// Colors resolved to a cube state
    StateResolved,
    /// Move list executed
    SolveComplete,
    /// Robot back in its rest pose
    ParkComplete,

    // Safety events
    /// Fatal fault reported by the engine or a collaborator
    ErrorDetected(ErrorKind),
}

impl Event {
    /// Check if this event comes from the operator
    pub fn is_operator_event(&self) -> bool {
        matches!(
            self,
            Event::StartPressed
                | Event::NextCube
                | Event::ShutdownRequested
                | Event::AcknowledgeError
        )
    }
}
