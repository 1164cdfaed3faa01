//! Physical motion
//!
//! - [`ActuatorSequencer`]: the only component that commands motors
//! - [`backlash`]: pure rotation planning (overshoot, squaring,
//!   squisher counter-motion)
//! - [`RobotPhysicalState`]: last confirmed pose of the mechanism
//! - [`TimingStats`]: time spent per primitive

pub mod backlash;
pub mod sequencer;
pub mod state;
pub mod timing;

pub use backlash::{plan_rotation, round_to_quarter_turn, squisher_compensation, SubMove};
pub use sequencer::{ActuatorSequencer, Actuators};
pub use state::RobotPhysicalState;
pub use timing::TimingStats;
