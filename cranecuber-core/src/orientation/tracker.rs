//! Orientation tracker
//!
//! Applies completed physical rotations and flips to the facing map, but
//! only when the motion actually carried the whole cube:
//!
//! - A rotation moves the side faces only if at least
//!   `face_turn_row_threshold` rows were in the turntable. With fewer rows
//!   only an outer slice turned and the centres stayed put.
//! - A flip moves the cube only if no rows were elevated. Otherwise the
//!   cube is held above the flipper and the flip just parks it.

use super::facing::{Direction, FaceLabel, FacingMap};

/// Owns the facing map for the session
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    facing: FacingMap,
    face_turn_row_threshold: u8,
}

impl OrientationTracker {
    /// Start from the canonical orientation
    pub fn new(face_turn_row_threshold: u8) -> Self {
        Self {
            facing: FacingMap::canonical(),
            face_turn_row_threshold,
        }
    }

    /// Current facing map
    pub fn facing(&self) -> &FacingMap {
        &self.facing
    }

    /// Rows that must turn for the side faces to count as moved
    pub fn face_turn_row_threshold(&self) -> u8 {
        self.face_turn_row_threshold
    }

    /// Change the threshold after the cube size became known
    pub fn set_face_turn_row_threshold(&mut self, rows: u8) {
        self.face_turn_row_threshold = rows;
    }

    /// Record a completed turntable rotation
    pub fn apply_rotation(&mut self, clockwise: bool, quarter_turns: u8, rows_elevated: u8) {
        if rows_elevated >= self.face_turn_row_threshold {
            self.facing = self.facing.rotated(clockwise, quarter_turns);
            log::debug!("facing after rotation: {}", self.facing);
        }
    }

    /// Record a completed flip; `now_at_init` is the flipper position after it
    pub fn apply_flip(&mut self, now_at_init: bool, rows_elevated: u8) {
        if rows_elevated == 0 {
            self.facing = self.facing.flipped(now_at_init);
            log::debug!("facing after flip: {}", self.facing);
        }
    }

    /// Direction currently holding `face`
    pub fn resolve_direction(&self, face: FaceLabel) -> Direction {
        // A bijection always contains every face
        self.facing.direction_of(face).unwrap_or(Direction::Up)
    }

    /// Forget all motion and return to the canonical orientation
    pub fn reset(&mut self) {
        self.facing = FacingMap::canonical();
    }
}
