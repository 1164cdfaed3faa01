//! Backlash compensation
//!
//! The turntable gearing has slack, so a rotation overshoots its target
//! and then squares back:
//!
//! - Free (whole cube in the turntable): overshoot by `free_touch`, then
//!   land on the nearest quarter-turn boundary after `free_square`.
//! - Blocked (some rows held by the flipper): overshoot by
//!   `blocked_touch` with a ramped profile, back off by
//!   `blocked_square_cube`, then land on the nearest boundary after
//!   `blocked_square_turntable`.
//!
//! Each sub-move of the turntable drags the squisher with it, so the
//! squisher is driven the other way at a matching speed.

use heapless::Vec;

use crate::config::{GeometryProfile, RobotConfig};
use crate::error::ConfigurationError;

/// One turntable move within a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMove {
    /// Absolute turntable target
    pub target: i32,
    /// Use the slow ramped profile
    pub precise: bool,
}

/// Round to the nearest multiple of `quarter_turn`, ties to even
pub fn round_to_quarter_turn(degrees: i32, quarter_turn: i32) -> i32 {
    let quotient = degrees.div_euclid(quarter_turn);
    let remainder = degrees.rem_euclid(quarter_turn);
    let turns = match (remainder * 2).cmp(&quarter_turn) {
        core::cmp::Ordering::Less => quotient,
        core::cmp::Ordering::Greater => quotient + 1,
        core::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        core::cmp::Ordering::Equal => quotient + 1,
    };
    turns * quarter_turn
}

/// Plan the turntable sub-moves for one rotation starting at `start`
pub fn plan_rotation(
    start: i32,
    clockwise: bool,
    quarter_turns: u8,
    free: bool,
    profile: &GeometryProfile,
    config: &RobotConfig,
) -> Result<Vec<SubMove, 3>, ConfigurationError> {
    if !(1..=2).contains(&quarter_turns) {
        return Err(ConfigurationError::QuarterTurnsOutOfRange(quarter_turns));
    }
    let quarter = config.turntable_quarter_turn_degrees;
    let sign = if clockwise { 1 } else { -1 };
    let turn = quarter * quarter_turns as i32;

    let mut plan = Vec::new();
    if free {
        let touch = start + sign * (profile.free_touch_degrees + turn);
        let square = round_to_quarter_turn(touch + sign * profile.free_square_turntable_degrees, quarter);
        let _ = plan.push(SubMove {
            target: touch,
            precise: false,
        });
        let _ = plan.push(SubMove {
            target: square,
            precise: false,
        });
    } else {
        let touch = start + sign * (profile.blocked_touch_degrees + turn);
        let square_cube = touch + sign * profile.blocked_square_cube_degrees;
        let square = round_to_quarter_turn(
            square_cube + sign * profile.blocked_square_turntable_degrees,
            quarter,
        );
        let _ = plan.push(SubMove {
            target: touch,
            precise: true,
        });
        let _ = plan.push(SubMove {
            target: square_cube,
            precise: false,
        });
        let _ = plan.push(SubMove {
            target: square,
            precise: false,
        });
    }
    Ok(plan)
}

/// Squisher motion that keeps the clamp still during a turntable move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquisherCompensation {
    /// Relative squisher move; positive closes
    pub degrees: i32,
    /// Speed that makes it last as long as the turntable move
    pub speed: u16,
}

/// Counter-motion for a turntable move of `turntable_delta` degrees
///
/// Turning the turntable clockwise opens the clamp, so the squisher is
/// closed by the same angle after both gear reductions, and vice versa.
/// Returns `None` when the move is too small to need compensation.
pub fn squisher_compensation(
    turntable_delta: i32,
    turntable_speed: u16,
    config: &RobotConfig,
) -> Option<SquisherCompensation> {
    let delta = turntable_delta.unsigned_abs() as u64;
    let divisor =
        config.turntable_gear_ratio_x1000 as u64 * config.squisher_gear_ratio_x1000 as u64;
    if divisor == 0 {
        return None;
    }
    let magnitude = delta * 1_000_000 / divisor;
    if magnitude == 0 {
        return None;
    }
    // Same duration: squisher / speed_sq == delta / speed_tt
    let speed = (magnitude * turntable_speed as u64 / delta).clamp(1, u16::MAX as u64) as u16;
    let degrees = magnitude as i32 * turntable_delta.signum();
    Some(SquisherCompensation { degrees, speed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn targets(plan: &[SubMove]) -> std::vec::Vec<i32> {
        plan.iter().map(|m| m.target).collect()
    }

    #[test]
    fn test_round_to_quarter_turn() {
        assert_eq!(round_to_quarter_turn(0, 420), 0);
        assert_eq!(round_to_quarter_turn(414, 420), 420);
        assert_eq!(round_to_quarter_turn(6, 420), 0);
        assert_eq!(round_to_quarter_turn(-214, 420), -420);
        assert_eq!(round_to_quarter_turn(-206, 420), 0);
        // Ties go to the even multiple
        assert_eq!(round_to_quarter_turn(210, 420), 0);
        assert_eq!(round_to_quarter_turn(630, 420), 840);
        assert_eq!(round_to_quarter_turn(-210, 420), 0);
    }

    #[test]
    fn test_blocked_plan_3x3() {
        let profile = GeometryProfile::for_size(3).unwrap();
        let config = RobotConfig::new();
        let plan = plan_rotation(0, true, 1, false, &profile, &config).unwrap();
        assert_eq!(targets(&plan), [634, 334, 420]);
        assert!(plan[0].precise);
        assert!(!plan[1].precise);

        let plan = plan_rotation(420, false, 1, false, &profile, &config).unwrap();
        assert_eq!(targets(&plan), [-214, 86, 0]);
    }

    #[test]
    fn test_free_plan() {
        let profile = GeometryProfile::for_size(3).unwrap();
        let config = RobotConfig::new();
        let plan = plan_rotation(0, true, 2, true, &profile, &config).unwrap();
        assert_eq!(targets(&plan), [920, 840]);
        let plan = plan_rotation(840, false, 1, true, &profile, &config).unwrap();
        assert_eq!(targets(&plan), [340, 420]);
    }

    #[test]
    fn test_plan_rejects_bad_turns() {
        let profile = GeometryProfile::for_size(3).unwrap();
        let config = RobotConfig::new();
        assert_eq!(
            plan_rotation(0, true, 3, true, &profile, &config),
            Err(ConfigurationError::QuarterTurnsOutOfRange(3))
        );
        assert!(plan_rotation(0, true, 0, false, &profile, &config).is_err());
    }

    #[test]
    fn test_squisher_compensation() {
        let config = RobotConfig::new();
        // 634 / 4.666 / 1.8 = 75.5
        let comp = squisher_compensation(634, 1050, &config).unwrap();
        assert_eq!(comp.degrees, 75);
        assert_eq!(comp.speed, 124);
        let comp = squisher_compensation(-634, 1050, &config).unwrap();
        assert_eq!(comp.degrees, -75);
        assert!(squisher_compensation(4, 1050, &config).is_none());
        assert!(squisher_compensation(0, 1050, &config).is_none());
    }

    proptest! {
        #[test]
        fn test_rounding_is_nearest_multiple(degrees in -100_000i32..100_000) {
            let rounded = round_to_quarter_turn(degrees, 420);
            prop_assert_eq!(rounded % 420, 0);
            prop_assert!((rounded - degrees).abs() <= 210);
        }

        #[test]
        fn test_rotation_lands_on_boundary(
            size in 2u8..=7,
            start_turns in -20i32..20,
            clockwise in any::<bool>(),
            quarter_turns in 1u8..=2,
            free in any::<bool>(),
        ) {
            let profile = GeometryProfile::for_size(size).unwrap();
            let config = RobotConfig::new();
            let start = start_turns * 420;
            let plan = plan_rotation(start, clockwise, quarter_turns, free, &profile, &config).unwrap();
            let end = plan[plan.len() - 1].target;
            let sign = if clockwise { 1 } else { -1 };
            prop_assert_eq!(end, start + sign * 420 * quarter_turns as i32);
        }

        #[test]
        fn test_compensation_matches_duration(delta in -5000i32..5000) {
            let config = RobotConfig::new();
            if let Some(comp) = squisher_compensation(delta, 1050, &config) {
                prop_assert_eq!(comp.degrees.signum(), delta.signum());
                // Squisher time (deg / speed) within 2% of turntable time
                let tt_ms = delta.unsigned_abs() as u64 * 1000 / 1050;
                let sq_ms = comp.degrees.unsigned_abs() as u64 * 1000 / comp.speed as u64;
                prop_assert!(sq_ms + 1 >= tt_ms);
                prop_assert!(sq_ms <= tt_ms + tt_ms / 50 + 1);
            }
        }
    }
}
