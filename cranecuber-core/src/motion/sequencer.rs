//! Actuator sequencer
//!
//! Executes the four primitives against the current [`GeometryProfile`]:
//!
//! - `elevate(rows)`: raise or lower the elevator, with jam recovery
//! - `rotate(clockwise, quarter_turns)`: turntable rotation with backlash
//!   compensation and squisher counter-motion
//! - `flip()`: tip the cube (or park the flipper if rows are elevated)
//! - `squish()`: clamp the cube square, then release
//!
//! The sequencer owns [`RobotPhysicalState`] and the
//! [`OrientationTracker`], and updates both only after a motion has been
//! confirmed complete. Every motor call blocks until that motor stops.

use cranecuber_hal::{Clock, Motor, MotorError, Ramp, StopAction};

use super::backlash::{plan_rotation, round_to_quarter_turn, squisher_compensation};
use super::state::RobotPhysicalState;
use super::timing::TimingStats;
use crate::config::{GeometryProfile, RobotConfig};
use crate::error::{Actuator, ConfigurationError, Fault};
use crate::orientation::{FacingMap, OrientationTracker};
use crate::safety::JamDetector;

/// Elevator ramp when lowering to a non-zero row
const RAMP_DOWN_ROWS: Ramp = Ramp::new(200, 200);
/// Elevator ramp when dropping all the way down
const RAMP_DOWN_ZERO: Ramp = Ramp::new(500, 400);
/// Elevator ramp when raising; ramp up to avoid slamming into the cube
const RAMP_UP: Ramp = Ramp::new(200, 50);
/// Turntable ramp for the blocked overshoot
const RAMP_PRECISE: Ramp = Ramp::new(200, 500);
/// Flipper ramp with the cube resting in it
const RAMP_FLIP_LOADED: Ramp = Ramp::new(0, 500);

/// Homing speeds (positive lowers the elevator, positive returns the flipper)
const HOME_ELEVATOR_SPEED: i16 = 30;
const HOME_ELEVATOR_CREEP_SPEED: i16 = 20;
const HOME_ELEVATOR_BACKOFF: i32 = -50;
const HOME_ELEVATOR_BACKOFF_SPEED: u16 = 200;
const HOME_FLIPPER_SPEED: i16 = 150;
const HOME_CREEP_TIMEOUT_MS: u32 = 4000;

/// Timeouts for the squisher release and reset
const SQUISH_RELEASE_TIMEOUT_MS: u32 = 2000;
const SQUISHER_RESET_TIMEOUT_MS: u32 = 4000;
const FLIP_SETTLE_TIMEOUT_MS: u32 = 2000;

/// The four motors of the robot
#[derive(Debug, Clone)]
pub struct Actuators<M> {
    pub elevator: M,
    pub flipper: M,
    pub turntable: M,
    pub squisher: M,
}

impl<M> Actuators<M> {
    /// Motor driving `actuator`
    pub fn get_mut(&mut self, actuator: Actuator) -> &mut M {
        match actuator {
            Actuator::Elevator => &mut self.elevator,
            Actuator::Flipper => &mut self.flipper,
            Actuator::Turntable => &mut self.turntable,
            Actuator::Squisher => &mut self.squisher,
        }
    }

    /// Motor driving `actuator`
    pub fn get(&self, actuator: Actuator) -> &M {
        match actuator {
            Actuator::Elevator => &self.elevator,
            Actuator::Flipper => &self.flipper,
            Actuator::Turntable => &self.turntable,
            Actuator::Squisher => &self.squisher,
        }
    }
}

/// Executes primitive operations and owns the robot pose
pub struct ActuatorSequencer<M: Motor, C: Clock> {
    motors: Actuators<M>,
    clock: C,
    profile: GeometryProfile,
    config: RobotConfig,
    state: RobotPhysicalState,
    tracker: OrientationTracker,
    timing: TimingStats,
    /// A flip tipped the cube and it may have slid off the flipper wall
    settle_pending: bool,
}

impl<M: Motor, C: Clock> ActuatorSequencer<M, C> {
    /// Create a sequencer; the robot is assumed homed
    pub fn new(motors: Actuators<M>, clock: C, profile: GeometryProfile, config: RobotConfig) -> Self {
        let tracker = OrientationTracker::new(profile.face_turn_row_threshold);
        Self {
            motors,
            clock,
            profile,
            config,
            state: RobotPhysicalState::new(),
            tracker,
            timing: TimingStats::default(),
            settle_pending: false,
        }
    }

    pub fn profile(&self) -> &GeometryProfile {
        &self.profile
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Last confirmed pose
    pub fn state(&self) -> &RobotPhysicalState {
        &self.state
    }

    pub fn tracker(&self) -> &OrientationTracker {
        &self.tracker
    }

    /// Current facing map
    pub fn facing(&self) -> &FacingMap {
        self.tracker.facing()
    }

    pub fn timing(&self) -> &TimingStats {
        &self.timing
    }

    pub fn reset_timing(&mut self) {
        self.timing.reset();
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn motors(&self) -> &Actuators<M> {
        &self.motors
    }

    /// Direct motor access, for drivers and test rigs
    pub fn motors_mut(&mut self) -> &mut Actuators<M> {
        &mut self.motors
    }

    /// Switch to the profile of a newly detected cube size
    ///
    /// Only allowed with the elevator down, since row targets differ
    /// between profiles.
    pub fn set_profile(&mut self, profile: GeometryProfile) -> Result<(), ConfigurationError> {
        if self.state.rows_elevated != 0 {
            return Err(ConfigurationError::RowsElevated(self.state.rows_elevated));
        }
        profile.validate()?;
        log::info!("using {}x{}x{} profile", profile.size, profile.size, profile.size);
        self.tracker
            .set_face_turn_row_threshold(profile.face_turn_row_threshold);
        self.profile = profile;
        Ok(())
    }

    /// Forget the facing map, for a fresh cube in the canonical orientation
    pub fn reset_orientation(&mut self) {
        self.tracker.reset();
    }

    // ---- motor helpers -------------------------------------------------

    fn position(&mut self, actuator: Actuator) -> Result<i32, Fault> {
        self.motors
            .get_mut(actuator)
            .current_position()
            .map_err(Fault::motor(actuator))
    }

    fn move_to(
        &mut self,
        actuator: Actuator,
        target: i32,
        speed: u16,
        ramp: Ramp,
        stop: StopAction,
    ) -> Result<(), Fault> {
        self.motors
            .get_mut(actuator)
            .move_to_absolute_position(target, speed, ramp, stop)
            .map_err(Fault::motor(actuator))
    }

    fn move_by(&mut self, actuator: Actuator, delta: i32, speed: u16, stop: StopAction) -> Result<(), Fault> {
        self.motors
            .get_mut(actuator)
            .move_relative(delta, speed, stop)
            .map_err(Fault::motor(actuator))
    }

    /// Wait for a motion to end
    ///
    /// A timeout is not an error here: the motion is over either way and
    /// the caller checks the displacement where it matters.
    fn wait(&mut self, actuator: Actuator, timeout_ms: u32) -> Result<(), Fault> {
        Self::tolerate_timeout(
            actuator,
            self.motors.get_mut(actuator).wait_until_stopped(timeout_ms),
        )
    }

    fn run_until_stalled(
        &mut self,
        actuator: Actuator,
        speed: i16,
        stop: StopAction,
        timeout_ms: u32,
    ) -> Result<(), Fault> {
        Self::tolerate_timeout(
            actuator,
            self.motors
                .get_mut(actuator)
                .run_until_stalled(speed, stop, timeout_ms),
        )
    }

    fn tolerate_timeout(actuator: Actuator, result: Result<(), MotorError>) -> Result<(), Fault> {
        match result {
            Err(MotorError::Timeout) => {
                log::warn!("{} still moving after timeout", actuator);
                Ok(())
            }
            other => other.map_err(Fault::motor(actuator)),
        }
    }

    fn reset_position(&mut self, actuator: Actuator) -> Result<(), Fault> {
        self.motors
            .get_mut(actuator)
            .reset_position()
            .map_err(Fault::motor(actuator))
    }

    fn stop(&mut self, actuator: Actuator, action: StopAction) -> Result<(), Fault> {
        self.motors
            .get_mut(actuator)
            .stop(action)
            .map_err(Fault::motor(actuator))
    }

    /// Re-declare zero if a move to zero ended off target
    fn rezero_if_off(&mut self, actuator: Actuator, actual: i32) -> Result<(), Fault> {
        if actual != 0 {
            log::debug!("{} stopped at {}, re-zeroing", actuator, actual);
            self.reset_position(actuator)?;
            self.stop(actuator, StopAction::Hold)?;
        }
        Ok(())
    }

    // ---- elevate -------------------------------------------------------

    /// Raise or lower the elevator so `rows` rows are in the turntable
    pub fn elevate(&mut self, rows: u8) -> Result<(), Fault> {
        let from = self.state.rows_elevated;
        let target = self.profile.elevate_target(rows)?;

        if rows == from {
            log::debug!("elevate: {} rows already in turntable", rows);
            return Ok(());
        }

        if from == 0 && self.settle_pending {
            self.flip_settle()?;
        }

        let started = self.clock.now_ms();
        let start = self.position(Actuator::Elevator)?;
        let speed = self.profile.elevator_speed;
        let timeout = self.config.elevator_timeout_ms;

        if rows < from {
            let ramp = if rows > 0 { RAMP_DOWN_ROWS } else { RAMP_DOWN_ZERO };
            self.move_to(Actuator::Elevator, target, speed, ramp, StopAction::Hold)?;
            self.wait(Actuator::Elevator, timeout)?;
        } else {
            self.move_to(Actuator::Elevator, target, speed, RAMP_UP, StopAction::Hold)?;
            self.wait(Actuator::Elevator, timeout)?;

            let detector = JamDetector::Percent(self.config.jam_tolerance_percent);
            let actual = self.position(Actuator::Elevator)?;
            if let Some(fault) = detector.check(start, target, actual).into_fault(Actuator::Elevator) {
                log::warn!("elevate jammed ({}), attempting to clear", fault);
                self.clear_elevator_jam(target)?;

                let actual = self.position(Actuator::Elevator)?;
                if let Some(fault) = detector.check(start, target, actual).into_fault(Actuator::Elevator) {
                    log::error!("{}", fault);
                    return Err(fault);
                }
            }
        }

        let elapsed = self.clock.elapsed_ms(started);
        self.timing.elevate_ms += elapsed;
        self.state.rows_elevated = rows;
        if rows > 0 {
            self.settle_pending = false;
        }

        if target == 0 {
            let actual = self.position(Actuator::Elevator)?;
            self.rezero_if_off(Actuator::Elevator, actual)?;
        }

        log::info!("elevate {} -> {} rows (target {}) took {}ms", from, rows, target, elapsed);
        Ok(())
    }

    /// Drop the cube, jog it loose with two slow flips and try once more
    fn clear_elevator_jam(&mut self, target: i32) -> Result<(), Fault> {
        let speed = self.profile.elevator_speed;
        let timeout = self.config.elevator_timeout_ms;

        self.move_to(Actuator::Elevator, 0, speed, Ramp::NONE, StopAction::Hold)?;
        self.wait(Actuator::Elevator, timeout)?;

        self.squisher_reset()?;
        self.flip_with(true)?;
        self.flip_with(true)?;

        self.move_to(Actuator::Elevator, target, speed, RAMP_UP, StopAction::Hold)?;
        self.wait(Actuator::Elevator, timeout)
    }

    // ---- rotate --------------------------------------------------------

    /// Rotate the turntable by one or two quarter turns
    ///
    /// With every row elevated the cube spins freely; otherwise the lower
    /// rows are held and the blocked overshoot profile is used.
    pub fn rotate(&mut self, clockwise: bool, quarter_turns: u8) -> Result<(), Fault> {
        let started = self.clock.now_ms();
        let rows = self.state.rows_elevated;
        let free = rows == self.profile.size;

        let start = self.position(Actuator::Turntable)?;
        let plan = plan_rotation(start, clockwise, quarter_turns, free, &self.profile, &self.config)?;
        for sub in &plan {
            log::debug!("turntable sub-move to {} (precise {})", sub.target, sub.precise);
            self.turntable_move(sub.target, sub.precise)?;
        }

        self.state.turntable_degrees = self.position(Actuator::Turntable)?;
        self.tracker.apply_rotation(clockwise, quarter_turns, rows);

        let elapsed = self.clock.elapsed_ms(started);
        self.timing.rotate_ms += elapsed;
        log::info!(
            "rotate {} {} quarter turns, {}, {} -> {} took {}ms",
            if clockwise { "cw" } else { "ccw" },
            quarter_turns,
            if free { "free" } else { "blocked" },
            start,
            self.state.turntable_degrees,
            elapsed
        );
        Ok(())
    }

    /// Move the turntable to `target` with the squisher following along
    fn turntable_move(&mut self, target: i32, precise: bool) -> Result<(), Fault> {
        let start = self.position(Actuator::Turntable)?;
        let delta = target - start;
        if delta == 0 {
            return Ok(());
        }

        let speed = self.config.turntable_speed;
        let ramp = if precise { RAMP_PRECISE } else { Ramp::NONE };
        let timeout = self.config.turntable_timeout_ms;

        self.move_to(Actuator::Turntable, target, speed, ramp, StopAction::Hold)?;
        let compensation = squisher_compensation(delta, speed, &self.config);
        if let Some(comp) = compensation {
            self.move_by(Actuator::Squisher, comp.degrees, comp.speed, StopAction::Coast)?;
        }

        self.wait(Actuator::Turntable, timeout)?;
        if let Some(comp) = compensation {
            self.wait(Actuator::Squisher, timeout)?;
            self.state.squisher_degrees += comp.degrees;
        }
        Ok(())
    }

    /// Accurate turntable move to an absolute position
    pub fn turn_to(&mut self, target: i32) -> Result<(), Fault> {
        self.turntable_move(target, true)?;
        self.state.turntable_degrees = self.position(Actuator::Turntable)?;
        Ok(())
    }

    // ---- flip ----------------------------------------------------------

    /// Flip toward or away from the camera, whichever is next
    pub fn flip(&mut self) -> Result<(), Fault> {
        self.flip_with(false)
    }

    fn flip_with(&mut self, slow: bool) -> Result<(), Fault> {
        let started = self.clock.now_ms();
        let rows = self.state.rows_elevated;
        let to_init = !self.state.flipper_at_init;
        let target = if to_init { 0 } else { self.config.flipper_degrees };

        // A loaded flipper must go slowly or the cube slides on the stop
        let (speed, ramp) = if rows == 0 {
            let speed = if slow {
                self.config.flipper_speed / 4
            } else {
                self.config.flipper_speed
            };
            (speed, RAMP_FLIP_LOADED)
        } else {
            (self.config.flipper_speed.saturating_mul(2), Ramp::NONE)
        };

        let start = self.position(Actuator::Flipper)?;
        self.move_to(Actuator::Flipper, target, speed, ramp, StopAction::Hold)?;
        self.wait(Actuator::Flipper, self.config.flipper_timeout_ms)?;
        let actual = self.position(Actuator::Flipper)?;

        let detector = JamDetector::Degrees(self.config.flip_jam_degrees());
        if let Some(fault) = detector.check(start, target, actual).into_fault(Actuator::Flipper) {
            log::error!("{}", fault);
            return Err(fault);
        }
        if target == 0 {
            self.rezero_if_off(Actuator::Flipper, actual)?;
        }

        self.state.flipper_at_init = to_init;
        self.tracker.apply_flip(to_init, rows);
        if rows == 0 {
            self.settle_pending = true;
        }

        let elapsed = self.clock.elapsed_ms(started);
        self.timing.flip_ms += elapsed;
        log::info!(
            "flip {} with {} rows elevated, {} -> {} took {}ms",
            if to_init { "to init" } else { "to camera" },
            rows,
            start,
            actual,
            elapsed
        );
        Ok(())
    }

    /// Tilt the flipper and return so the cube slides back flush
    ///
    /// Without this the cube can sit slightly forward after a flip and jam
    /// the next time it is raised.
    pub fn flip_settle(&mut self) -> Result<(), Fault> {
        self.settle_pending = false;
        if !self.state.flipper_at_init {
            log::debug!("flip_settle: flipper away from init, nothing to settle");
            return Ok(());
        }

        let started = self.clock.now_ms();
        let speed = self.config.flipper_speed;
        let timeout = FLIP_SETTLE_TIMEOUT_MS;

        self.move_to(
            Actuator::Flipper,
            self.config.flip_settle_degrees,
            speed,
            Ramp::NONE,
            StopAction::Hold,
        )?;
        self.wait(Actuator::Flipper, timeout)?;
        self.move_to(Actuator::Flipper, 0, speed / 2, RAMP_FLIP_LOADED, StopAction::Hold)?;
        self.wait(Actuator::Flipper, timeout)?;

        self.timing.flip_ms += self.clock.elapsed_ms(started);
        log::debug!("flip_settle done");
        Ok(())
    }

    /// Flip back to the init position if not already there
    pub fn flip_to_init(&mut self) -> Result<(), Fault> {
        if !self.state.flipper_at_init {
            self.flip()?;
        }
        Ok(())
    }

    /// Move the flipper without tipping the cube
    ///
    /// Holds one row in the turntable while the flipper moves.
    pub fn flip_with_elevator_clear(&mut self) -> Result<(), Fault> {
        if self.state.rows_elevated != 0 {
            return Err(ConfigurationError::RowsElevated(self.state.rows_elevated).into());
        }
        self.elevate(1)?;
        self.flip()?;
        self.elevate(0)
    }

    // ---- squisher ------------------------------------------------------

    /// Clamp the cube square, then release it
    pub fn squish(&mut self) -> Result<(), Fault> {
        let started = self.clock.now_ms();
        let throw = self.profile.squish_degrees;
        let speed = self.config.squish_speed;

        self.stop(Actuator::Turntable, StopAction::Hold)?;
        self.reset_position(Actuator::Squisher)?;

        self.move_by(Actuator::Squisher, throw, speed, StopAction::Brake)?;
        self.wait(Actuator::Squisher, self.config.squisher_timeout_ms)?;
        self.stop(Actuator::Squisher, StopAction::Brake)?;

        self.move_by(Actuator::Squisher, -throw, speed, StopAction::Coast)?;
        self.wait(Actuator::Squisher, SQUISH_RELEASE_TIMEOUT_MS)?;
        self.stop(Actuator::Squisher, StopAction::Coast)?;
        self.stop(Actuator::Turntable, StopAction::Brake)?;

        self.state.squisher_degrees = 0;
        let elapsed = self.clock.elapsed_ms(started);
        self.timing.squish_ms += elapsed;
        log::info!("squish {} degrees took {}ms", throw, elapsed);
        Ok(())
    }

    /// Open the squisher against its stop and zero it
    pub fn squisher_reset(&mut self) -> Result<(), Fault> {
        self.run_until_stalled(
            Actuator::Squisher,
            self.config.squisher_reset_speed,
            StopAction::Coast,
            SQUISHER_RESET_TIMEOUT_MS,
        )?;
        self.reset_position(Actuator::Squisher)?;
        if self.state.squisher_degrees != 0 {
            log::debug!("squisher drift of {} degrees cleared", self.state.squisher_degrees);
        }
        self.state.squisher_degrees = 0;
        log::info!("squisher reset");
        Ok(())
    }

    // ---- session -------------------------------------------------------

    /// Find the hard stops of every actuator and zero them
    pub fn home(&mut self) -> Result<(), Fault> {
        let homing = self.config.homing_timeout_ms;

        log::info!("homing elevator");
        self.run_until_stalled(Actuator::Elevator, HOME_ELEVATOR_SPEED, StopAction::Brake, homing)?;
        self.reset_position(Actuator::Elevator)?;
        self.move_by(
            Actuator::Elevator,
            HOME_ELEVATOR_BACKOFF,
            HOME_ELEVATOR_BACKOFF_SPEED,
            StopAction::Hold,
        )?;
        self.wait(Actuator::Elevator, self.config.elevator_timeout_ms)?;
        self.run_until_stalled(
            Actuator::Elevator,
            HOME_ELEVATOR_CREEP_SPEED,
            StopAction::Hold,
            HOME_CREEP_TIMEOUT_MS,
        )?;
        self.reset_position(Actuator::Elevator)?;
        self.stop(Actuator::Elevator, StopAction::Brake)?;

        log::info!("homing flipper");
        self.run_until_stalled(Actuator::Flipper, HOME_FLIPPER_SPEED, StopAction::Hold, homing)?;
        self.reset_position(Actuator::Flipper)?;
        self.stop(Actuator::Flipper, StopAction::Hold)?;

        log::info!("homing turntable");
        self.reset_position(Actuator::Turntable)?;
        self.stop(Actuator::Turntable, StopAction::Hold)?;

        log::info!("homing squisher");
        self.squisher_reset()?;
        self.stop(Actuator::Squisher, StopAction::Brake)?;

        self.state = RobotPhysicalState::new();
        self.tracker.reset();
        self.settle_pending = false;
        Ok(())
    }

    /// Return to the canonical rest pose
    pub fn park(&mut self) -> Result<(), Fault> {
        log::info!("parking");
        self.elevate(0)?;
        self.squisher_reset()?;
        self.flip_to_init()?;

        let position = self.position(Actuator::Turntable)?;
        let square = round_to_quarter_turn(position, self.config.turntable_quarter_turn_degrees);
        self.turn_to(square)
    }

    /// Best-effort stop: lower the elevator, release the squisher, brake
    ///
    /// Errors are logged, not returned, so every step is attempted.
    pub fn shutdown(&mut self) {
        log::info!("shutting down actuators");
        if let Err(e) = self.elevate(0) {
            log::warn!("shutdown: lowering elevator failed: {}", e);
        }

        let stops = [
            (Actuator::Squisher, StopAction::Coast),
            (Actuator::Elevator, StopAction::Brake),
            (Actuator::Flipper, StopAction::Brake),
            (Actuator::Turntable, StopAction::Brake),
        ];
        for (actuator, action) in stops {
            if let Err(e) = self.stop(actuator, action) {
                log::warn!("shutdown: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{Direction, FaceLabel};
    use crate::testing::{sequencer, TestSequencer};

    fn motions(seq: &TestSequencer) -> usize {
        let m = seq.motors();
        m.elevator.motion_count()
            + m.flipper.motion_count()
            + m.turntable.motion_count()
            + m.squisher.motion_count()
    }

    #[test]
    fn test_elevate_reaches_row_targets() {
        let mut seq = sequencer(3);
        seq.elevate(2).unwrap();
        assert_eq!(seq.state().rows_elevated, 2);
        assert_eq!(seq.motors().elevator.position(), -239);
        seq.elevate(0).unwrap();
        assert_eq!(seq.motors().elevator.position(), 0);
    }

    #[test]
    fn test_elevate_is_idempotent() {
        let mut seq = sequencer(4);
        seq.elevate(3).unwrap();
        let before = motions(&seq);
        seq.elevate(3).unwrap();
        assert_eq!(seq.state().rows_elevated, 3);
        assert_eq!(motions(&seq), before);
    }

    #[test]
    fn test_config_errors_issue_no_motion() {
        let mut seq = sequencer(3);
        assert_eq!(
            seq.elevate(4),
            Err(Fault::Configuration(ConfigurationError::RowsOutOfRange { rows: 4, size: 3 }))
        );
        assert_eq!(
            seq.rotate(true, 3),
            Err(Fault::Configuration(ConfigurationError::QuarterTurnsOutOfRange(3)))
        );
        assert_eq!(
            seq.rotate(false, 0),
            Err(Fault::Configuration(ConfigurationError::QuarterTurnsOutOfRange(0)))
        );
        assert_eq!(motions(&seq), 0);
        assert_eq!(*seq.state(), RobotPhysicalState::new());
    }

    #[test]
    fn test_elevator_jam_is_fatal_after_one_retry() {
        let mut seq = sequencer(3);
        seq.motors_mut().elevator.inject_shortfall(50);
        // Recovery drop to zero completes, the retry falls short again
        seq.motors_mut().elevator.inject_shortfall(100);
        seq.motors_mut().elevator.inject_shortfall(50);

        let result = seq.elevate(3);
        assert!(matches!(
            result,
            Err(Fault::CubeJammed {
                axis: Actuator::Elevator,
                ..
            })
        ));
        assert_eq!(seq.state().rows_elevated, 0);
        // Two recovery flips leave the cube as it was
        assert!(seq.state().flipper_at_init);
        assert_eq!(*seq.facing(), FacingMap::canonical());
    }

    #[test]
    fn test_elevator_jam_recovers() {
        let mut seq = sequencer(3);
        seq.motors_mut().elevator.inject_shortfall(40);
        seq.elevate(1).unwrap();
        assert_eq!(seq.state().rows_elevated, 1);
        assert_eq!(seq.motors().elevator.position(), -197);
        // Two jog flips happened
        assert_eq!(seq.motors().flipper.motion_count(), 2);
    }

    #[test]
    fn test_small_shortfall_tolerated() {
        let mut seq = sequencer(3);
        seq.motors_mut().elevator.inject_shortfall(95);
        seq.elevate(3).unwrap();
        assert_eq!(seq.motors().flipper.motion_count(), 0);
    }

    #[test]
    fn test_flip_jam() {
        let mut seq = sequencer(3);
        seq.motors_mut().flipper.inject_shortfall(30);
        let result = seq.flip();
        assert!(matches!(
            result,
            Err(Fault::CubeJammed {
                axis: Actuator::Flipper,
                moved: 42,
                expected: 140
            })
        ));
        assert!(seq.state().flipper_at_init);
        assert_eq!(*seq.facing(), FacingMap::canonical());
    }

    #[test]
    fn test_flip_tips_cube_only_when_down() {
        let mut seq = sequencer(3);
        seq.flip().unwrap();
        assert!(!seq.state().flipper_at_init);
        assert_eq!(seq.facing().up(), FaceLabel::F);
        assert_eq!(seq.motors().flipper.position(), -140);

        seq.elevate(3).unwrap();
        seq.flip().unwrap();
        assert!(seq.state().flipper_at_init);
        assert_eq!(seq.facing().up(), FaceLabel::F);
    }

    #[test]
    fn test_settle_before_raising_after_flip() {
        let mut seq = sequencer(3);
        seq.flip().unwrap();
        seq.flip().unwrap();
        let flips = seq.motors().flipper.motion_count();
        // Flipper at init with the cube tipped onto it: tilt and return
        seq.elevate(2).unwrap();
        assert_eq!(seq.motors().flipper.motion_count(), flips + 2);
        assert_eq!(seq.motors().flipper.position(), 0);
    }

    #[test]
    fn test_rotate_free_lands_on_quarter_turn() {
        let mut seq = sequencer(3);
        seq.elevate(3).unwrap();
        seq.rotate(true, 1).unwrap();
        assert_eq!(seq.state().turntable_degrees, 420);
        assert_eq!(seq.facing().face(Direction::North), FaceLabel::L);
        seq.rotate(false, 2).unwrap();
        assert_eq!(seq.state().turntable_degrees, -420);
    }

    #[test]
    fn test_rotate_blocked_below_threshold_keeps_facing() {
        let mut seq = sequencer(4);
        seq.elevate(3).unwrap();
        seq.rotate(true, 1).unwrap();
        assert_eq!(*seq.facing(), FacingMap::canonical());
        assert_eq!(seq.state().turntable_degrees, 420);
        // overshoot, square cube, square turntable
        assert_eq!(seq.motors().turntable.motion_count(), 3);
    }

    #[test]
    fn test_rotate_drives_squisher_along() {
        let mut seq = sequencer(3);
        seq.elevate(1).unwrap();
        seq.rotate(true, 1).unwrap();
        assert_eq!(seq.motors().squisher.motion_count(), 3);
        assert_ne!(seq.state().squisher_degrees, 0);
        assert_eq!(seq.state().squisher_degrees, seq.motors().squisher.position());
    }

    #[test]
    fn test_squish_zeroes_squisher() {
        let mut seq = sequencer(5);
        seq.elevate(2).unwrap();
        seq.rotate(true, 1).unwrap();
        seq.squish().unwrap();
        assert_eq!(seq.state().squisher_degrees, 0);
        assert_eq!(seq.motors().squisher.position(), 0);
    }

    #[test]
    fn test_flip_with_elevator_clear() {
        let mut seq = sequencer(3);
        seq.flip_with_elevator_clear().unwrap();
        assert!(!seq.state().flipper_at_init);
        assert_eq!(seq.state().rows_elevated, 0);
        assert_eq!(*seq.facing(), FacingMap::canonical());

        seq.elevate(2).unwrap();
        assert_eq!(
            seq.flip_with_elevator_clear(),
            Err(Fault::Configuration(ConfigurationError::RowsElevated(2)))
        );
    }

    #[test]
    fn test_park_returns_to_rest() {
        let mut seq = sequencer(3);
        seq.flip().unwrap();
        seq.elevate(1).unwrap();
        seq.rotate(true, 1).unwrap();
        seq.park().unwrap();

        let state = seq.state();
        assert_eq!(state.rows_elevated, 0);
        assert!(state.flipper_at_init);
        assert_eq!(state.turntable_degrees % 420, 0);
        assert_eq!(state.squisher_degrees, 0);
    }

    #[test]
    fn test_home_resets_pose() {
        let mut seq = sequencer(3);
        seq.flip().unwrap();
        seq.home().unwrap();
        assert_eq!(*seq.state(), RobotPhysicalState::new());
        assert_eq!(*seq.facing(), FacingMap::canonical());
        assert_eq!(seq.motors().flipper.position(), 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut seq = sequencer(3);
        seq.elevate(3).unwrap();
        seq.shutdown();
        assert_eq!(seq.state().rows_elevated, 0);
        let after = motions(&seq);
        seq.shutdown();
        assert_eq!(motions(&seq), after);
    }

    #[test]
    fn test_set_profile_requires_elevator_down() {
        let mut seq = sequencer(6);
        seq.elevate(1).unwrap();
        let profile = GeometryProfile::for_size(3).unwrap();
        assert_eq!(
            seq.set_profile(profile.clone()),
            Err(ConfigurationError::RowsElevated(1))
        );
        seq.elevate(0).unwrap();
        seq.set_profile(profile).unwrap();
        assert_eq!(seq.profile().size, 3);
        assert_eq!(seq.tracker().face_turn_row_threshold(), 2);
    }
}
