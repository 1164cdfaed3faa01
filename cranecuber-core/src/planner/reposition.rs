//! Repositioning
//!
//! The camera faces South and only the flipper can change which face is
//! Up. Bringing a face to the top is a fixed sequence per direction; the
//! start of the sequence depends on where the flipper is and whether rows
//! are already elevated:
//!
//! | Direction | Sequence |
//! |-----------|----------|
//! | North     | get the flipper away from init with the cube down, then flip back |
//! | South     | get the flipper to init with the cube down, then flip away |
//! | East/West | lift the whole cube, quarter turn so it faces the flip axis, then flip |
//! | Down      | flip, park the flipper with one row up, flip again |
//!
//! Plans are pure data so they can be checked without a robot.

use core::fmt;

use heapless::Vec;

use cranecuber_hal::{Clock, Motor};

use crate::config::GeometryProfile;
use crate::error::Fault;
use crate::motion::ActuatorSequencer;
use crate::orientation::Direction;

/// One primitive operation of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Elevate(u8),
    Rotate { clockwise: bool, quarter_turns: u8 },
    Flip,
    Squish,
}

/// Longest repositioning sequence
pub const MAX_PLAN_LEN: usize = 8;

/// Sequence of primitives
pub type RepositionPlan = Vec<Primitive, MAX_PLAN_LEN>;

/// Primitives that bring the face in `direction` to the top with `rows`
/// rows elevated
pub fn plan_bring_to_top(
    direction: Direction,
    rows: u8,
    flipper_at_init: bool,
    rows_elevated: u8,
    profile: &GeometryProfile,
) -> RepositionPlan {
    use Primitive::*;

    let raised = rows_elevated > 0;
    let steps: &[Primitive] = match direction {
        Direction::Up => &[],
        Direction::North => match (flipper_at_init, raised) {
            (true, true) => &[Flip, Elevate(0)],
            (true, false) => &[Elevate(1), Flip, Elevate(0)],
            (false, true) => &[Elevate(0)],
            (false, false) => &[],
        },
        Direction::South => match (flipper_at_init, raised) {
            (true, true) => &[Elevate(0)],
            (true, false) => &[],
            (false, true) => &[Flip, Elevate(0)],
            (false, false) => &[Elevate(1), Flip, Elevate(0)],
        },
        Direction::East | Direction::West => &[],
        Direction::Down => &[Elevate(0), Flip, Elevate(1), Flip, Elevate(0)],
    };

    let mut plan = RepositionPlan::new();
    let mut push = |p: Primitive| {
        // Sequences are bounded by MAX_PLAN_LEN
        let _ = plan.push(p);
    };
    for step in steps {
        push(*step);
    }

    match direction {
        Direction::East | Direction::West => {
            // The quarter turn must move the target face onto the flip axis
            let clockwise = (direction == Direction::East) == flipper_at_init;
            push(Elevate(profile.size));
            if profile.reposition_squish {
                push(Squish);
            }
            push(Rotate {
                clockwise,
                quarter_turns: 1,
            });
            push(Elevate(0));
            push(Flip);
        }
        Direction::Up => {}
        _ => push(Flip),
    }
    push(Elevate(rows));
    plan
}

/// Repositions per direction, for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositionCounts {
    pub north: u32,
    pub south: u32,
    pub east: u32,
    pub west: u32,
    pub down: u32,
}

impl RepositionCounts {
    fn record(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north += 1,
            Direction::South => self.south += 1,
            Direction::East => self.east += 1,
            Direction::West => self.west += 1,
            Direction::Down => self.down += 1,
            Direction::Up => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.north + self.south + self.east + self.west + self.down
    }
}

impl fmt::Display for RepositionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} north, {} south, {} east, {} west, {} down ({} total)",
            self.north,
            self.south,
            self.east,
            self.west,
            self.down,
            self.total()
        )
    }
}

/// Executes repositioning plans and checks their outcome
#[derive(Debug, Clone, Default)]
pub struct Repositioner {
    counts: RepositionCounts,
}

impl Repositioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> &RepositionCounts {
        &self.counts
    }

    pub fn reset_counts(&mut self) {
        self.counts = RepositionCounts::default();
    }

    /// Bring the face now in `direction` to the top, then elevate `rows`
    pub fn bring_to_top<M: Motor, C: Clock>(
        &mut self,
        sequencer: &mut ActuatorSequencer<M, C>,
        direction: Direction,
        rows: u8,
    ) -> Result<(), Fault> {
        let expected = sequencer.facing().face(direction);
        let state = *sequencer.state();
        let plan = plan_bring_to_top(
            direction,
            rows,
            state.flipper_at_init,
            state.rows_elevated,
            sequencer.profile(),
        );
        log::info!("bring {} ({}) to top: {:?}", direction, expected, plan.as_slice());

        for step in &plan {
            match *step {
                Primitive::Elevate(r) => sequencer.elevate(r)?,
                Primitive::Rotate {
                    clockwise,
                    quarter_turns,
                } => sequencer.rotate(clockwise, quarter_turns)?,
                Primitive::Flip => sequencer.flip()?,
                Primitive::Squish => sequencer.squish()?,
            }
        }
        self.counts.record(direction);

        let actual = sequencer.facing().up();
        if actual != expected {
            log::error!("repositioning left {} on top instead of {}", actual, expected);
            return Err(Fault::InvariantViolation { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{FaceLabel, FacingMap};
    use crate::testing::sequencer;
    use Primitive::*;

    fn plan(direction: Direction, rows: u8, at_init: bool, elevated: u8, size: u8) -> std::vec::Vec<Primitive> {
        let profile = GeometryProfile::for_size(size).unwrap();
        plan_bring_to_top(direction, rows, at_init, elevated, &profile).to_vec()
    }

    #[test]
    fn test_north_plans() {
        assert_eq!(plan(Direction::North, 1, true, 2, 3), [Flip, Elevate(0), Flip, Elevate(1)]);
        assert_eq!(
            plan(Direction::North, 1, true, 0, 3),
            [Elevate(1), Flip, Elevate(0), Flip, Elevate(1)]
        );
        assert_eq!(plan(Direction::North, 2, false, 3, 3), [Elevate(0), Flip, Elevate(2)]);
        assert_eq!(plan(Direction::North, 2, false, 0, 3), [Flip, Elevate(2)]);
    }

    #[test]
    fn test_south_plans() {
        assert_eq!(plan(Direction::South, 1, true, 0, 3), [Flip, Elevate(1)]);
        assert_eq!(
            plan(Direction::South, 1, false, 0, 3),
            [Elevate(1), Flip, Elevate(0), Flip, Elevate(1)]
        );
    }

    #[test]
    fn test_east_west_plans() {
        let rotate = |clockwise| Rotate {
            clockwise,
            quarter_turns: 1,
        };
        assert_eq!(
            plan(Direction::East, 1, true, 0, 3),
            [Elevate(3), Squish, rotate(true), Elevate(0), Flip, Elevate(1)]
        );
        assert_eq!(
            plan(Direction::West, 1, true, 0, 3),
            [Elevate(3), Squish, rotate(false), Elevate(0), Flip, Elevate(1)]
        );
        // No squish for the big cubes
        assert_eq!(
            plan(Direction::East, 2, false, 0, 6),
            [Elevate(6), rotate(false), Elevate(0), Flip, Elevate(2)]
        );
    }

    #[test]
    fn test_down_plan() {
        assert_eq!(
            plan(Direction::Down, 1, true, 0, 3),
            [Elevate(0), Flip, Elevate(1), Flip, Elevate(0), Flip, Elevate(1)]
        );
    }

    #[test]
    fn test_every_direction_reaches_top() {
        let sides = [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Down,
        ];
        for size in 2..=7 {
            for at_init in [true, false] {
                for elevated in [0, 1] {
                    for direction in sides {
                        let mut seq = sequencer(size);
                        if !at_init {
                            seq.flip_with_elevator_clear().unwrap();
                        }
                        seq.elevate(elevated).unwrap();
                        let expected = seq.facing().face(direction);

                        let mut repositioner = Repositioner::new();
                        repositioner.bring_to_top(&mut seq, direction, 1).unwrap();
                        assert_eq!(seq.facing().up(), expected);
                        assert!(seq.facing().is_bijection());
                        assert_eq!(seq.state().rows_elevated, 1);
                        assert_eq!(repositioner.counts().total(), 1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_east_scenario_facing() {
        let mut seq = sequencer(3);
        let mut repositioner = Repositioner::new();
        repositioner.bring_to_top(&mut seq, Direction::East, 1).unwrap();
        assert_eq!(
            *seq.facing(),
            FacingMap::from_faces(
                FaceLabel::R,
                FaceLabel::L,
                FaceLabel::U,
                FaceLabel::D,
                FaceLabel::B,
                FaceLabel::F
            )
        );
        assert_eq!(repositioner.counts().east, 1);
    }
}
