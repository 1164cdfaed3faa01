//! ev3dev touch sensor
//!
//! `value0` reads `1` while the button is pressed.

use std::io;

use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin};

use crate::port::InputPort;
use crate::sysfs::{Device, LEGO_SENSOR_CLASS};

/// Failure reading the sensor attribute
#[derive(Debug, thiserror::Error)]
#[error("touch sensor read failed: {0}")]
pub struct TouchReadError(#[from] io::Error);

impl Error for TouchReadError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// EV3 touch sensor on an input port
#[derive(Debug)]
pub struct Ev3TouchSensor {
    device: Device,
}

impl Ev3TouchSensor {
    /// Open the touch sensor plugged into `port`
    pub fn open(port: InputPort) -> Result<Self, TouchReadError> {
        let device = Device::find(LEGO_SENSOR_CLASS, port.address())?;
        log::info!("{}: touch sensor at {}", port, device.path().display());
        Ok(Self { device })
    }
}

impl ErrorType for Ev3TouchSensor {
    type Error = TouchReadError;
}

impl InputPin for Ev3TouchSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.device.read_int("value0")? != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|pressed| !pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cranecuber_hal::TouchSensor;
    use std::fs;

    #[test]
    fn test_reads_value0() {
        let dir = std::env::temp_dir().join(format!("cranecuber-touch-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("value0"), "1\n").unwrap();

        let mut sensor = Ev3TouchSensor {
            device: Device::new(&dir),
        };
        assert!(sensor.is_pressed().unwrap());

        fs::write(dir.join("value0"), "0\n").unwrap();
        assert!(!sensor.is_pressed().unwrap());

        fs::remove_dir_all(dir).unwrap();
    }
}
