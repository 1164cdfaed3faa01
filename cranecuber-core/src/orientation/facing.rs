//! Directions, face labels and the facing map

use core::fmt;

use crate::error::MoveError;

/// Fixed spatial slot in the robot frame
///
/// Seen from above with the camera to the South.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All six directions, in index order
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Get the opposite direction
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        })
    }
}

/// One of the cube's six faces, named as in solver notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceLabel {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl FaceLabel {
    /// All six faces, in scan/solver order
    pub const ALL: [FaceLabel; 6] = [
        FaceLabel::U,
        FaceLabel::L,
        FaceLabel::F,
        FaceLabel::R,
        FaceLabel::B,
        FaceLabel::D,
    ];

    /// Parse a face letter
    pub fn from_char(c: char) -> Result<Self, MoveError> {
        match c {
            'U' => Ok(FaceLabel::U),
            'L' => Ok(FaceLabel::L),
            'F' => Ok(FaceLabel::F),
            'R' => Ok(FaceLabel::R),
            'B' => Ok(FaceLabel::B),
            'D' => Ok(FaceLabel::D),
            other => Err(MoveError::UnknownFace(other)),
        }
    }

    /// Face letter
    pub const fn as_char(self) -> char {
        match self {
            FaceLabel::U => 'U',
            FaceLabel::L => 'L',
            FaceLabel::F => 'F',
            FaceLabel::R => 'R',
            FaceLabel::B => 'B',
            FaceLabel::D => 'D',
        }
    }

    /// Face on the other side of the cube
    pub const fn opposite(self) -> Self {
        match self {
            FaceLabel::U => FaceLabel::D,
            FaceLabel::D => FaceLabel::U,
            FaceLabel::L => FaceLabel::R,
            FaceLabel::R => FaceLabel::L,
            FaceLabel::F => FaceLabel::B,
            FaceLabel::B => FaceLabel::F,
        }
    }
}

impl fmt::Display for FaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Which face occupies each direction
///
/// Always a bijection: every transformation is a permutation of the
/// slots, so no face can be lost or duplicated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacingMap {
    slots: [FaceLabel; 6],
}

impl Default for FacingMap {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FacingMap {
    /// Orientation at session start: U on top, F facing the camera
    pub const fn canonical() -> Self {
        Self::from_faces(
            FaceLabel::U,
            FaceLabel::D,
            FaceLabel::B,
            FaceLabel::F,
            FaceLabel::R,
            FaceLabel::L,
        )
    }

    /// Build a map from the face in each direction
    ///
    /// The caller is responsible for passing six distinct faces; see
    /// [`FacingMap::is_bijection`].
    pub const fn from_faces(
        up: FaceLabel,
        down: FaceLabel,
        north: FaceLabel,
        south: FaceLabel,
        east: FaceLabel,
        west: FaceLabel,
    ) -> Self {
        Self {
            slots: [up, down, north, south, east, west],
        }
    }

    /// Face currently in `direction`
    pub const fn face(&self, direction: Direction) -> FaceLabel {
        self.slots[direction.index()]
    }

    /// Face currently on top
    pub const fn up(&self) -> FaceLabel {
        self.face(Direction::Up)
    }

    /// Direction currently holding `face`
    pub fn direction_of(&self, face: FaceLabel) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| self.face(*d) == face)
    }

    /// Check that all six faces appear exactly once
    pub fn is_bijection(&self) -> bool {
        FaceLabel::ALL
            .iter()
            .all(|face| self.slots.iter().filter(|f| *f == face).count() == 1)
    }

    /// Map after turning the whole cube about the vertical axis
    ///
    /// `clockwise` is as seen from above. Up and Down never change.
    pub fn rotated(&self, clockwise: bool, quarter_turns: u8) -> Self {
        let [up, down, north, south, east, west] = self.slots;
        match (quarter_turns % 4, clockwise) {
            (0, _) => *self,
            (2, _) => Self::from_faces(up, down, south, north, west, east),
            (1, true) | (3, false) => Self::from_faces(up, down, west, east, north, south),
            _ => Self::from_faces(up, down, east, west, south, north),
        }
    }

    /// Map after tipping the cube with the flipper
    ///
    /// `to_init` is true when the flipper moved back to its initial
    /// position. East and West never change.
    pub fn flipped(&self, to_init: bool) -> Self {
        let [up, down, north, south, east, west] = self.slots;
        if to_init {
            Self::from_faces(north, south, down, up, east, west)
        } else {
            Self::from_faces(south, north, up, down, east, west)
        }
    }
}

impl fmt::Debug for FacingMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Up {}, Down {}, North {}, South {}, East {}, West {}",
            self.slots[0], self.slots[1], self.slots[2], self.slots[3], self.slots[4], self.slots[5]
        )
    }
}

impl fmt::Display for FacingMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonical_layout() {
        let map = FacingMap::canonical();
        assert_eq!(map.up(), FaceLabel::U);
        assert_eq!(map.face(Direction::South), FaceLabel::F);
        assert_eq!(map.face(Direction::East), FaceLabel::R);
        assert_eq!(map.face(Direction::West), FaceLabel::L);
        assert_eq!(map.face(Direction::North), FaceLabel::B);
        assert_eq!(map.face(Direction::Down), FaceLabel::D);
        assert!(map.is_bijection());
    }

    #[test]
    fn test_direction_of_every_face() {
        let map = FacingMap::canonical();
        for direction in Direction::ALL {
            assert_eq!(map.direction_of(map.face(direction)), Some(direction));
        }
    }

    #[test]
    fn test_clockwise_quarter_turn() {
        // West moves to North when turning clockwise seen from above
        let map = FacingMap::canonical().rotated(true, 1);
        assert_eq!(map.face(Direction::North), FaceLabel::L);
        assert_eq!(map.face(Direction::West), FaceLabel::F);
        assert_eq!(map.face(Direction::South), FaceLabel::R);
        assert_eq!(map.face(Direction::East), FaceLabel::B);
        assert_eq!(map.up(), FaceLabel::U);
    }

    #[test]
    fn test_half_turn_swaps_opposites() {
        let map = FacingMap::canonical().rotated(false, 2);
        assert_eq!(map.face(Direction::North), FaceLabel::F);
        assert_eq!(map.face(Direction::South), FaceLabel::B);
        assert_eq!(map.face(Direction::East), FaceLabel::L);
        assert_eq!(map.face(Direction::West), FaceLabel::R);
    }

    #[test]
    fn test_flip_away_then_back() {
        let away = FacingMap::canonical().flipped(false);
        assert_eq!(away.up(), FaceLabel::F);
        assert_eq!(away.face(Direction::North), FaceLabel::U);
        assert_eq!(away.face(Direction::Down), FaceLabel::B);
        assert_eq!(away.face(Direction::East), FaceLabel::R);

        assert_eq!(away.flipped(true), FacingMap::canonical());
    }

    #[test]
    fn test_opposite_faces() {
        for face in FaceLabel::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_ne!(face.opposite(), face);
        }
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn test_opposites_stay_opposite() {
        // Rigid motions keep opposite faces in opposite directions
        let map = FacingMap::canonical().rotated(true, 1).flipped(false).rotated(false, 2);
        for direction in Direction::ALL {
            assert_eq!(map.face(direction.opposite()), map.face(direction).opposite());
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Rotate(bool, u8),
        Flip(bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), 1u8..=2).prop_map(|(cw, q)| Op::Rotate(cw, q)),
            any::<bool>().prop_map(Op::Flip),
        ]
    }

    proptest! {
        #[test]
        fn test_bijection_under_any_sequence(ops in proptest::collection::vec(op(), 0..64)) {
            let mut map = FacingMap::canonical();
            for op in ops {
                map = match op {
                    Op::Rotate(cw, q) => map.rotated(cw, q),
                    Op::Flip(to_init) => map.flipped(to_init),
                };
                prop_assert!(map.is_bijection());
            }
        }

        #[test]
        fn test_rotation_symmetry(ops in proptest::collection::vec(op(), 0..16), cw in any::<bool>()) {
            let mut map = FacingMap::canonical();
            for op in ops {
                map = match op {
                    Op::Rotate(cw, q) => map.rotated(cw, q),
                    Op::Flip(to_init) => map.flipped(to_init),
                };
            }
            prop_assert_eq!(map.rotated(cw, 1).rotated(!cw, 1), map);
            prop_assert_eq!(map.rotated(cw, 2), map.rotated(cw, 1).rotated(cw, 1));
        }
    }
}
