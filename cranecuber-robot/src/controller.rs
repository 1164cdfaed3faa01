//! Session controller
//!
//! Drives the session state machine. Each state does its work and reports
//! back an event:
//!
//! 1. home
//! 2. wait for the start press (skipped when auto-starting)
//! 3. scan the six faces on the 6x6x6 profile
//! 4. size detection from the square count, then re-profile
//! 5. cube state and solution from the daemon
//! 6. compress and run the move list, then park
//!
//! A cancellation from the touch sensor or a signal moves the session to
//! `ShuttingDown`; any error moves it to `Error`. Both end with the
//! actuators shut down.

use std::sync::Arc;

use cranecuber_core::config::{GeometryProfile, RobotConfig, SCAN_CUBE_SIZE};
use cranecuber_core::motion::{ActuatorSequencer, Actuators};
use cranecuber_core::moves::{compress_moves, parse_move_list, MoveList};
use cranecuber_core::scan::{detect_size, scan, ScanOutcome};
use cranecuber_core::scheduler::SolutionRunner;
use cranecuber_core::state::{Event, State};
use cranecuber_hal::Motor;
use cranecuber_hal_ev3dev::SystemClock;

use crate::error::AppError;
use crate::server::Vision;
use crate::signals::SessionSignals;

/// How the session runs
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Move list to run instead of scanning and solving
    pub moves: Option<String>,
    /// Cube size for `moves`
    pub size: u8,
    /// Start without waiting for the touch sensor
    pub auto_start: bool,
    /// Stop after one cube
    pub once: bool,
}

pub struct Controller<M: Motor, V: Vision> {
    runner: SolutionRunner<M, SystemClock>,
    vision: V,
    signals: Arc<SessionSignals>,
    options: SessionOptions,
    state: State,
    solution: MoveList,
    parked: bool,
}

impl<M: Motor, V: Vision> Controller<M, V> {
    pub fn new(
        motors: Actuators<M>,
        config: RobotConfig,
        vision: V,
        signals: Arc<SessionSignals>,
        options: SessionOptions,
    ) -> Result<Self, AppError> {
        let profile = GeometryProfile::for_size(SCAN_CUBE_SIZE)?;
        let sequencer = ActuatorSequencer::new(motors, SystemClock::new(), profile, config);
        Ok(Self {
            runner: SolutionRunner::new(sequencer),
            vision,
            signals,
            options,
            state: State::Boot,
            solution: MoveList::new(),
            parked: false,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    #[cfg(test)]
    pub fn runner(&self) -> &SolutionRunner<M, SystemClock> {
        &self.runner
    }

    #[cfg(test)]
    pub fn vision(&self) -> &V {
        &self.vision
    }

    fn sequencer(&mut self) -> &mut ActuatorSequencer<M, SystemClock> {
        self.runner.sequencer_mut()
    }

    /// Run sessions until shutdown
    ///
    /// Returns `Ok` after a clean or cancelled shutdown, and the first
    /// error otherwise. The actuators are shut down either way.
    pub fn run(&mut self) -> Result<(), AppError> {
        let mut fault = None;

        loop {
            match self.state {
                State::ShuttingDown => {
                    self.sequencer().shutdown();
                    log::info!("session finished");
                    return Ok(());
                }
                State::Error(kind) => {
                    log::error!("session stopped: {}", kind);
                    self.sequencer().shutdown();
                    return Err(fault.unwrap_or(AppError::Session(kind)));
                }
                _ => {}
            }

            let event = match self.step() {
                Ok(_) if self.signals.is_cancelled() => Event::ShutdownRequested,
                Ok(event) => event,
                Err(e) => {
                    log::error!("{:?}: {}", self.state, e);
                    let kind = e.kind();
                    fault = Some(e);
                    Event::ErrorDetected(kind)
                }
            };

            let next = self.state.transition(event);
            log::debug!("{:?} + {:?} -> {:?}", self.state, event, next);
            self.state = next;
        }
    }

    /// Do the work of the current state
    fn step(&mut self) -> Result<Event, AppError> {
        match self.state {
            State::Boot => Ok(Event::BootComplete),
            State::Homing => {
                self.sequencer().home()?;
                Ok(Event::HomingComplete)
            }
            State::AwaitingStart => self.await_start(),
            State::Scanning => self.scan(),
            State::Resolving => self.resolve(),
            State::Solving => self.solve(),
            State::Parking => {
                if !self.parked {
                    self.sequencer().park()?;
                }
                Ok(Event::ParkComplete)
            }
            State::Complete => Ok(if self.options.once {
                Event::ShutdownRequested
            } else {
                Event::NextCube
            }),
            State::ShuttingDown | State::Error(_) => Ok(Event::ShutdownRequested),
        }
    }

    fn await_start(&mut self) -> Result<Event, AppError> {
        // A new cube goes in the canonical orientation
        self.parked = false;
        self.solution.clear();
        let sequencer = self.sequencer();
        sequencer.reset_orientation();
        sequencer.set_profile(GeometryProfile::for_size(SCAN_CUBE_SIZE)?)?;

        if self.options.auto_start {
            return Ok(Event::StartPressed);
        }
        log::info!("waiting for touch sensor press");
        Ok(if self.signals.wait_for_start() {
            Event::StartPressed
        } else {
            Event::ShutdownRequested
        })
    }

    fn scan(&mut self) -> Result<Event, AppError> {
        if self.options.moves.is_some() {
            let profile = GeometryProfile::for_size(self.options.size)?;
            self.sequencer().set_profile(profile)?;
            return Ok(Event::ScanComplete);
        }

        let outcome = scan(self.runner.sequencer_mut(), &mut self.vision, &*self.signals)?;
        Ok(match outcome {
            ScanOutcome::Complete => Event::ScanComplete,
            ScanOutcome::Cancelled => Event::ShutdownRequested,
        })
    }

    fn resolve(&mut self) -> Result<Event, AppError> {
        let text = match &self.options.moves {
            Some(moves) => moves.clone(),
            None => {
                let colors = self.vision.rgb_colors()?;
                let size = detect_size(colors.len())?;
                log::info!("{}x{}x{} cube detected", size, size, size);
                self.sequencer().set_profile(GeometryProfile::for_size(size)?)?;

                let state = self.vision.cube_state(&colors)?;
                log::info!("cube state: {}", state);
                self.vision.solution(&state)?
            }
        };

        let parsed = parse_move_list(&text)?;
        self.solution = compress_moves(&parsed)?;
        log::info!(
            "solution: {} moves ({} before compression)",
            self.solution.len(),
            parsed.len()
        );
        Ok(Event::StateResolved)
    }

    fn solve(&mut self) -> Result<Event, AppError> {
        let report = self.runner.run(&self.solution, &*self.signals)?;
        self.parked = !report.cancelled;
        Ok(if report.cancelled {
            Event::ShutdownRequested
        } else {
            Event::SolveComplete
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cranecuber_core::motion::RobotPhysicalState;
    use cranecuber_core::scan::SCAN_ORDER;
    use cranecuber_core::state::ErrorKind;
    use cranecuber_core::{Error, MoveError};
    use cranecuber_hal_ev3dev::EmulatedMotor;

    use crate::config::EmulateConfig;
    use crate::server::EmulatedVision;

    fn motors() -> Actuators<EmulatedMotor> {
        Actuators {
            elevator: EmulatedMotor::new("elevator"),
            flipper: EmulatedMotor::new("flipper"),
            turntable: EmulatedMotor::new("turntable"),
            squisher: EmulatedMotor::new("squisher"),
        }
    }

    fn controller(
        emulate: EmulateConfig,
        options: SessionOptions,
    ) -> Controller<EmulatedMotor, EmulatedVision> {
        Controller::new(
            motors(),
            RobotConfig::new(),
            EmulatedVision::new(&emulate),
            Arc::new(SessionSignals::new()),
            options,
        )
        .unwrap()
    }

    fn once() -> SessionOptions {
        SessionOptions {
            auto_start: true,
            once: true,
            ..SessionOptions::default()
        }
    }

    #[test]
    fn test_emulated_session_scans_solves_and_parks() {
        let mut controller = controller(EmulateConfig::default(), once());
        controller.run().unwrap();

        assert_eq!(controller.state(), State::ShuttingDown);
        assert_eq!(controller.vision().captured(), &SCAN_ORDER);

        let sequencer = controller.runner().sequencer();
        assert_eq!(sequencer.profile().size, 3);
        assert_eq!(sequencer.state().rows_elevated, 0);
        assert!(sequencer.state().flipper_at_init);
        assert_eq!(sequencer.state().turntable_degrees % 420, 0);
    }

    #[test]
    fn test_literal_moves_skip_scan() {
        let options = SessionOptions {
            moves: Some("R U R' U'".to_string()),
            size: 4,
            ..once()
        };
        let mut controller = controller(EmulateConfig::default(), options);
        controller.run().unwrap();

        assert!(controller.vision().captured().is_empty());
        assert_eq!(controller.runner().sequencer().profile().size, 4);
        assert_eq!(
            *controller.runner().sequencer().state(),
            RobotPhysicalState {
                turntable_degrees: controller.runner().sequencer().state().turntable_degrees,
                ..RobotPhysicalState::new()
            }
        );
    }

    #[test]
    fn test_unsupported_move_is_an_error() {
        let options = SessionOptions {
            moves: Some("R 4Rw".to_string()),
            size: 5,
            ..once()
        };
        let mut controller = controller(EmulateConfig::default(), options);
        let result = controller.run();

        assert!(matches!(
            result,
            Err(AppError::Engine(Error::Move(MoveError::Unsupported { rows: 4, .. })))
        ));
        assert_eq!(controller.state(), State::Error(ErrorKind::UnsupportedMove));
    }

    #[test]
    fn test_unsupported_cube_size_detected() {
        let emulate = EmulateConfig {
            size: 9,
            ..EmulateConfig::default()
        };
        let mut controller = controller(emulate, once());
        let result = controller.run();

        assert!(matches!(result, Err(ref e) if e.kind() == ErrorKind::Configuration));
        assert_eq!(controller.vision().captured().len(), 6);
    }

    #[test]
    fn test_cancelled_before_start_shuts_down() {
        let signals = Arc::new(SessionSignals::new());
        signals.request_cancel();
        let mut controller = Controller::new(
            motors(),
            RobotConfig::new(),
            EmulatedVision::new(&EmulateConfig::default()),
            signals,
            SessionOptions::default(),
        )
        .unwrap();

        controller.run().unwrap();
        assert_eq!(controller.state(), State::ShuttingDown);
        assert!(controller.vision().captured().is_empty());
    }
}
