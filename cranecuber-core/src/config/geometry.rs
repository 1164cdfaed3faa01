//! Cube geometry profiles
//!
//! One profile per supported cube size (2x2x2 through 7x7x7). The numbers
//! are calibrated on the physical build; elevator targets are encoder
//! degrees with "up" negative.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Smallest supported cube
pub const MIN_CUBE_SIZE: u8 = 2;

/// Largest supported cube
pub const MAX_CUBE_SIZE: u8 = 7;

/// Profile used while scanning, before the size is known
///
/// The 6x6x6 profile lifts any supported cube clear of the flipper.
pub const SCAN_CUBE_SIZE: u8 = 6;

/// Extra elevator travel added to every row target
pub const ELEVATOR_ROW_OFFSET: i32 = 15;

/// Free-spin overshoot past the quarter-turn target
pub const FREE_TOUCH_DEGREES: i32 = 80;

/// Free-spin correction back toward the quarter-turn target
pub const FREE_SQUARE_TURNTABLE_DEGREES: i32 = -80;

/// Calibration table row
struct ProfileRow {
    size: u8,
    size_mm: u8,
    blocked_touch: i32,
    blocked_square_cube: i32,
    blocked_square_turntable: i32,
    squish: i32,
    threshold: u8,
    shortcut: bool,
    elevator_speed: u16,
    raw_targets: &'static [i32],
}

const PROFILES: [ProfileRow; 6] = [
    ProfileRow {
        size: 2,
        size_mm: 55,
        blocked_touch: 270,
        blocked_square_cube: -390,
        blocked_square_turntable: 80,
        squish: 140,
        threshold: 2,
        shortcut: false,
        // Light cube, gets knocked around at full speed
        elevator_speed: 600,
        raw_targets: &[-207, -285],
    },
    ProfileRow {
        size: 3,
        size_mm: 57,
        blocked_touch: 214,
        blocked_square_cube: -300,
        blocked_square_turntable: 80,
        squish: 120,
        threshold: 2,
        shortcut: true,
        elevator_speed: 1050,
        raw_targets: &[-182, -224, -281],
    },
    ProfileRow {
        size: 4,
        size_mm: 62,
        blocked_touch: 116,
        blocked_square_cube: -154,
        blocked_square_turntable: 40,
        squish: 100,
        threshold: 4,
        shortcut: false,
        elevator_speed: 1050,
        raw_targets: &[-159, -197, -235, -280],
    },
    ProfileRow {
        size: 5,
        size_mm: 63,
        blocked_touch: 100,
        blocked_square_cube: -140,
        blocked_square_turntable: 30,
        squish: 90,
        threshold: 3,
        shortcut: true,
        elevator_speed: 1050,
        raw_targets: &[-152, -185, -210, -239, -275],
    },
    ProfileRow {
        size: 6,
        size_mm: 67,
        blocked_touch: 68,
        blocked_square_cube: -90,
        blocked_square_turntable: 26,
        squish: 60,
        threshold: 6,
        shortcut: false,
        elevator_speed: 1050,
        raw_targets: &[-145, -170, -197, -217, -248, -272],
    },
    ProfileRow {
        size: 7,
        size_mm: 69,
        blocked_touch: 46,
        blocked_square_cube: -90,
        blocked_square_turntable: 26,
        squish: 55,
        threshold: 4,
        shortcut: true,
        elevator_speed: 1050,
        raw_targets: &[-132, -154, -177, -193, -220, -240, -263],
    },
];

/// Calibration constants for one cube size
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryProfile {
    /// Rows and columns per face
    pub size: u8,
    /// Cube edge length in millimetres
    pub size_mm: u8,
    /// Overshoot for a rotation with rows held by the flipper
    pub blocked_touch_degrees: i32,
    /// Back-off after a blocked rotation, squaring the turned rows
    pub blocked_square_cube_degrees: i32,
    /// Final move squaring the turntable after a blocked rotation
    pub blocked_square_turntable_degrees: i32,
    /// Overshoot for a rotation of the whole, unclamped cube
    pub free_touch_degrees: i32,
    /// Correction after a free rotation
    pub free_square_turntable_degrees: i32,
    /// Squisher throw when clamping the cube
    pub squish_degrees: i32,
    /// Elevator position for 1..=size rows, offset already applied
    pub elevate_targets: Vec<i32, { MAX_CUBE_SIZE as usize }>,
    /// Rows that must turn for the centres (and facing) to move
    pub face_turn_row_threshold: u8,
    /// Turn the face opposite Up by elevating the complement instead
    pub opposite_face_shortcut: bool,
    /// Squish before the quarter turn of an East/West reposition
    pub reposition_squish: bool,
    /// Elevator speed in degrees per second
    pub elevator_speed: u16,
}

impl GeometryProfile {
    /// Built-in profile for a cube size
    pub fn for_size(size: u8) -> Result<Self, ConfigurationError> {
        let row = PROFILES
            .iter()
            .find(|row| row.size == size)
            .ok_or(ConfigurationError::UnsupportedCubeSize(size))?;

        let mut elevate_targets = Vec::new();
        for raw in row.raw_targets {
            elevate_targets
                .push(raw - ELEVATOR_ROW_OFFSET)
                .map_err(|_| ConfigurationError::UnsupportedCubeSize(size))?;
        }

        Ok(Self {
            size,
            size_mm: row.size_mm,
            blocked_touch_degrees: row.blocked_touch,
            blocked_square_cube_degrees: row.blocked_square_cube,
            blocked_square_turntable_degrees: row.blocked_square_turntable,
            free_touch_degrees: FREE_TOUCH_DEGREES,
            free_square_turntable_degrees: FREE_SQUARE_TURNTABLE_DEGREES,
            squish_degrees: row.squish,
            elevate_targets,
            face_turn_row_threshold: row.threshold,
            opposite_face_shortcut: row.shortcut,
            // Big cubes are a tight fit and jam if squished mid-reposition
            reposition_squish: size < 6,
            elevator_speed: row.elevator_speed,
        })
    }

    /// Square edge length in 0.1 mm units
    pub fn square_size_mm_x10(&self) -> u16 {
        self.size_mm as u16 * 10 / self.size.max(1) as u16
    }

    /// Elevator position for `rows` rows in the turntable
    pub fn elevate_target(&self, rows: u8) -> Result<i32, ConfigurationError> {
        if rows == 0 {
            return Ok(0);
        }
        self.elevate_targets
            .get(rows as usize - 1)
            .copied()
            .filter(|_| rows <= self.size)
            .ok_or(ConfigurationError::RowsOutOfRange {
                rows,
                size: self.size,
            })
    }

    /// Check a profile loaded from configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(MIN_CUBE_SIZE..=MAX_CUBE_SIZE).contains(&self.size) {
            return Err(ConfigurationError::UnsupportedCubeSize(self.size));
        }
        if self.elevate_targets.len() != self.size as usize {
            return Err(ConfigurationError::Calibration(
                "one elevator target per row required",
            ));
        }
        // Each extra row needs the elevator higher (more negative)
        if self.elevate_targets.windows(2).any(|w| w[1] >= w[0]) || self.elevate_targets[0] >= 0 {
            return Err(ConfigurationError::Calibration(
                "elevator targets must rise with each row",
            ));
        }
        if self.face_turn_row_threshold == 0 || self.face_turn_row_threshold > self.size {
            return Err(ConfigurationError::Calibration(
                "face turn threshold outside 1..=size",
            ));
        }
        if self.squish_degrees <= 0 || self.elevator_speed == 0 {
            return Err(ConfigurationError::Calibration(
                "squish throw and elevator speed must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_size_has_valid_profile() {
        for size in MIN_CUBE_SIZE..=MAX_CUBE_SIZE {
            let profile = GeometryProfile::for_size(size).unwrap();
            assert_eq!(profile.size, size);
            assert_eq!(profile.elevate_targets.len(), size as usize);
            assert_eq!(profile.validate(), Ok(()));
        }
    }

    #[test]
    fn test_unsupported_sizes() {
        assert_eq!(
            GeometryProfile::for_size(1),
            Err(ConfigurationError::UnsupportedCubeSize(1))
        );
        assert_eq!(
            GeometryProfile::for_size(8),
            Err(ConfigurationError::UnsupportedCubeSize(8))
        );
    }

    #[test]
    fn test_elevate_targets_include_offset() {
        let profile = GeometryProfile::for_size(3).unwrap();
        assert_eq!(profile.elevate_target(0), Ok(0));
        assert_eq!(profile.elevate_target(1), Ok(-197));
        assert_eq!(profile.elevate_target(2), Ok(-239));
        assert_eq!(profile.elevate_target(3), Ok(-296));
        assert_eq!(
            profile.elevate_target(4),
            Err(ConfigurationError::RowsOutOfRange { rows: 4, size: 3 })
        );
    }

    #[test]
    fn test_shortcut_only_on_odd_cubes() {
        for size in MIN_CUBE_SIZE..=MAX_CUBE_SIZE {
            let profile = GeometryProfile::for_size(size).unwrap();
            assert_eq!(profile.opposite_face_shortcut, size % 2 == 1);
        }
    }

    #[test]
    fn test_square_size() {
        let profile = GeometryProfile::for_size(3).unwrap();
        assert_eq!(profile.square_size_mm_x10(), 190); // 57mm / 3
    }

    #[test]
    fn test_validate_rejects_bad_targets() {
        let mut profile = GeometryProfile::for_size(4).unwrap();
        profile.elevate_targets[2] = profile.elevate_targets[1];
        assert!(profile.validate().is_err());

        let mut profile = GeometryProfile::for_size(4).unwrap();
        profile.elevate_targets.pop();
        assert!(profile.validate().is_err());
    }
}
