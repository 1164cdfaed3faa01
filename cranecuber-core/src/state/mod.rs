//! Session state machine
//!
//! Drives one robot session: home, wait for the operator, scan, resolve,
//! solve, park. The machine is explicit, finite, and deterministic; the
//! controller performs the work for each state and feeds back events.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ErrorKind, State};
