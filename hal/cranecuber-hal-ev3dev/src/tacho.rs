//! ev3dev tacho motor driver
//!
//! Drives a LEGO Large or Medium motor through the `tacho-motor` sysfs
//! class. Motion commands write the set-points and then the `command`
//! attribute; completion is observed by polling the `state` flags.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use cranecuber_hal::{Motor, MotorError, Ramp, StopAction};

use crate::port::OutputPort;
use crate::sysfs::{Device, TACHO_MOTOR_CLASS};

/// How often `state` is polled while waiting on a motion
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long a freshly commanded motion may take to report `running`
const START_TIMEOUT: Duration = Duration::from_millis(100);

fn map_io(err: io::Error) -> MotorError {
    match err.kind() {
        io::ErrorKind::NotFound => MotorError::Disconnected,
        io::ErrorKind::InvalidInput => MotorError::InvalidCommand,
        _ => MotorError::Io,
    }
}

/// Motor state flags reported by the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StateFlags {
    running: bool,
    stalled: bool,
}

impl StateFlags {
    fn parse(raw: &str) -> Self {
        let mut flags = Self::default();
        for flag in raw.split_whitespace() {
            match flag {
                "running" => flags.running = true,
                "stalled" => flags.stalled = true,
                _ => {}
            }
        }
        flags
    }
}

/// Tacho motor on an EV3 output port
#[derive(Debug)]
pub struct TachoMotor {
    device: Device,
    port: OutputPort,
}

impl TachoMotor {
    /// Open the motor plugged into `port`
    pub fn open(port: OutputPort) -> Result<Self, MotorError> {
        let device = Device::find(TACHO_MOTOR_CLASS, port.address()).map_err(map_io)?;
        log::info!("{}: tacho motor at {}", port, device.path().display());
        Ok(Self { device, port })
    }

    /// Port this motor is plugged into
    pub fn port(&self) -> OutputPort {
        self.port
    }

    fn state(&self) -> Result<StateFlags, MotorError> {
        Ok(StateFlags::parse(&self.device.read_str("state").map_err(map_io)?))
    }

    fn command(&self, cmd: &str) -> Result<(), MotorError> {
        self.device.write("command", cmd).map_err(map_io)
    }

    /// Poll `state` until `done` holds or `timeout` passes
    fn wait_for(
        &self,
        timeout: Duration,
        done: impl Fn(StateFlags) -> bool,
    ) -> Result<bool, MotorError> {
        let start = Instant::now();
        loop {
            if done(self.state()?) {
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                return Ok(false);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Motor for TachoMotor {
    fn current_position(&mut self) -> Result<i32, MotorError> {
        self.device.read_int("position").map_err(map_io)
    }

    fn reset_position(&mut self) -> Result<(), MotorError> {
        // "reset" also restores every set-point to its default
        self.command("reset")
    }

    fn move_to_absolute_position(
        &mut self,
        target: i32,
        speed: u16,
        ramp: Ramp,
        stop: StopAction,
    ) -> Result<(), MotorError> {
        log::debug!("{}: run-to-abs-pos {} at {}", self.port, target, speed);
        self.device.write("stop_action", stop.as_str()).map_err(map_io)?;
        self.device.write("ramp_up_sp", ramp.up_ms).map_err(map_io)?;
        self.device.write("ramp_down_sp", ramp.down_ms).map_err(map_io)?;
        self.device.write("speed_sp", speed).map_err(map_io)?;
        self.device.write("position_sp", target).map_err(map_io)?;
        self.command("run-to-abs-pos")
    }

    fn move_relative(
        &mut self,
        delta: i32,
        speed: u16,
        stop: StopAction,
    ) -> Result<(), MotorError> {
        log::debug!("{}: run-to-rel-pos {} at {}", self.port, delta, speed);
        self.device.write("stop_action", stop.as_str()).map_err(map_io)?;
        self.device.write("ramp_up_sp", 0).map_err(map_io)?;
        self.device.write("ramp_down_sp", 0).map_err(map_io)?;
        self.device.write("speed_sp", speed).map_err(map_io)?;
        self.device.write("position_sp", delta).map_err(map_io)?;
        self.command("run-to-rel-pos")
    }

    fn run_until_stalled(
        &mut self,
        speed: i16,
        stop: StopAction,
        timeout_ms: u32,
    ) -> Result<(), MotorError> {
        log::debug!("{}: run-forever at {} until stalled", self.port, speed);
        self.device.write("stop_action", stop.as_str()).map_err(map_io)?;
        self.device.write("speed_sp", speed).map_err(map_io)?;
        self.command("run-forever")?;
        self.wait_for(START_TIMEOUT, |s| s.running)?;

        let stalled = self.wait_for(Duration::from_millis(timeout_ms as u64), |s| {
            s.stalled || !s.running
        })?;
        self.command("stop")?;
        if stalled {
            Ok(())
        } else {
            Err(MotorError::Timeout)
        }
    }

    fn wait_until_stopped(&mut self, timeout_ms: u32) -> Result<(), MotorError> {
        // A motion that finishes within one poll never reports running
        self.wait_for(START_TIMEOUT, |s| s.running)?;
        if self.wait_for(Duration::from_millis(timeout_ms as u64), |s| !s.running)? {
            Ok(())
        } else {
            log::warn!("{}: still running after {}ms", self.port, timeout_ms);
            Err(MotorError::Timeout)
        }
    }

    fn stop(&mut self, action: StopAction) -> Result<(), MotorError> {
        self.device.write("stop_action", action.as_str()).map_err(map_io)?;
        self.command("stop")
    }
}
