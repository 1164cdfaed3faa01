//! CraneCuber - NxNxN cube solving robot
//!
//! Robot program for a LEGO EV3 brick running ev3dev. Homes the robot,
//! waits for the touch sensor, scans the cube through the vision daemon,
//! and runs the solution the daemon returns.
//!
//! ```text
//! cranecuber                      # real robot, daemon from robot.toml
//! cranecuber --emulate            # no hardware, canned 3x3x3 solution
//! cranecuber --moves "R U R' U'" --size 3
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cranecuber_core::config::RobotConfig;
use cranecuber_core::motion::Actuators;
use cranecuber_core::Actuator;
use cranecuber_hal::Motor;
use cranecuber_hal_ev3dev::{EmulatedMotor, EmulatedTouch, Ev3TouchSensor, OutputPort, TachoMotor};

mod cli;
mod config;
mod controller;
mod error;
mod server;
mod signals;
mod tasks;

use crate::cli::Cli;
use crate::controller::{Controller, SessionOptions};
use crate::error::AppError;
use crate::server::{DaemonClient, EmulatedVision, Vision};
use crate::signals::SessionSignals;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("CraneCuber starting...");
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins, defaulting to info; `--verbose` forces debug
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = config::load(cli.config.as_deref())?;
    let signals = Arc::new(SessionSignals::new());
    tasks::spawn_signal_watcher(Arc::clone(&signals))?;
    let options = cli.session_options();

    if cli.emulate {
        log::info!("Emulating motors, touch sensor and camera");
        let motors = Actuators {
            elevator: EmulatedMotor::new("elevator"),
            flipper: EmulatedMotor::new("flipper"),
            turntable: EmulatedMotor::new("turntable"),
            squisher: EmulatedMotor::new("squisher"),
        };
        tasks::spawn_touch_monitor(EmulatedTouch::new(), Arc::clone(&signals))?;
        let vision = EmulatedVision::new(&config.emulate);
        run_session(motors, config.motion, vision, signals, options)
    } else {
        let ports = config.ports.resolve()?;
        let motors = Actuators {
            elevator: open_motor(Actuator::Elevator, ports.elevator)?,
            flipper: open_motor(Actuator::Flipper, ports.flipper)?,
            turntable: open_motor(Actuator::Turntable, ports.turntable)?,
            squisher: open_motor(Actuator::Squisher, ports.squisher)?,
        };
        let touch = Ev3TouchSensor::open(ports.touch)?;
        tasks::spawn_touch_monitor(touch, Arc::clone(&signals))?;

        let client = DaemonClient::new(&config.server);
        if options.moves.is_none() {
            client.ping()?;
            log::info!("daemon at {}:{} is up", config.server.host, config.server.port);
        }
        run_session(motors, config.motion, client, signals, options)
    }
}

fn open_motor(actuator: Actuator, port: OutputPort) -> Result<TachoMotor, AppError> {
    TachoMotor::open(port).map_err(|error| AppError::MotorOpen {
        actuator,
        port,
        error,
    })
}

fn run_session<M: Motor, V: Vision>(
    motors: Actuators<M>,
    motion: RobotConfig,
    vision: V,
    signals: Arc<SessionSignals>,
    options: SessionOptions,
) -> Result<(), AppError> {
    let mut controller = Controller::new(motors, motion, vision, signals, options)?;
    let result = controller.run();
    log::debug!("final state: {:?}", controller.state());
    result
}
