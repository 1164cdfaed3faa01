//! Move translation
//!
//! Decides how to get a move's face on top, then turns it:
//!
//! 1. face already Up: elevate the rows
//! 2. face opposite Up, on a cube with the shortcut: elevate the
//!    complementary rows and turn those instead
//! 3. otherwise reposition the face to the top
//!
//! Every move ends by lifting the whole cube and squishing it square.

use cranecuber_hal::{Clock, Motor};

use super::reposition::{RepositionCounts, Repositioner};
use crate::config::GeometryProfile;
use crate::error::{Error, MoveError};
use crate::motion::ActuatorSequencer;
use crate::moves::MoveSpec;
use crate::orientation::Direction;

/// Translates moves into primitive operations
#[derive(Debug, Clone, Default)]
pub struct MoveTranslator {
    repositioner: Repositioner,
}

impl MoveTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reposition_counts(&self) -> &RepositionCounts {
        self.repositioner.counts()
    }

    pub fn reset_counts(&mut self) {
        self.repositioner.reset_counts();
    }

    /// Check that the robot can address the move's layers
    ///
    /// Deeper than the face-turn threshold means a centre layer would be
    /// split; only a whole-cube move is allowed past it.
    pub fn check(spec: &MoveSpec, profile: &GeometryProfile) -> Result<(), MoveError> {
        let size = profile.size;
        let unsupported = spec.rows == 0
            || spec.rows > size
            || (spec.rows > profile.face_turn_row_threshold && spec.rows != size)
            || !(1..=2).contains(&spec.quarter_turns);
        if unsupported {
            return Err(MoveError::Unsupported {
                face: spec.target_face,
                rows: spec.rows,
                size,
            });
        }
        Ok(())
    }

    /// Execute one move
    pub fn apply<M: Motor, C: Clock>(
        &mut self,
        sequencer: &mut ActuatorSequencer<M, C>,
        spec: &MoveSpec,
    ) -> Result<(), Error> {
        Self::check(spec, sequencer.profile())?;

        let size = sequencer.profile().size;
        let shortcut = sequencer.profile().opposite_face_shortcut;
        let up = sequencer.facing().up();

        if spec.target_face == up {
            sequencer.elevate(spec.rows)?;
        } else if shortcut && spec.target_face == up.opposite() && spec.rows < size {
            log::debug!("{}: turning {} rows from {} instead", spec, size - spec.rows, up);
            sequencer.elevate(size - spec.rows)?;
        } else {
            let direction = sequencer.tracker().resolve_direction(spec.target_face);
            debug_assert_ne!(direction, Direction::Up);
            self.repositioner
                .bring_to_top(sequencer, direction, spec.rows)?;
        }

        sequencer.rotate(spec.clockwise, spec.quarter_turns)?;
        sequencer.elevate(size)?;
        sequencer.squish()?;
        Ok(())
    }
}
