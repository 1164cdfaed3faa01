//! Touch sensor abstraction
//!
//! The robot has a single push button used both to start a solve and to
//! abort one. Any [`embedded_hal::digital::InputPin`] that reads high while
//! pressed is a touch sensor.

use embedded_hal::digital::InputPin;

/// Errors reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// Sensor not found or unplugged
    #[error("sensor disconnected")]
    Disconnected,
    /// Reading the sensor value failed
    #[error("sensor read failed")]
    Io,
}

/// Momentary push button
pub trait TouchSensor {
    /// Check if the button is currently held down
    fn is_pressed(&mut self) -> Result<bool, SensorError>;
}

impl<P: InputPin> TouchSensor for P {
    fn is_pressed(&mut self) -> Result<bool, SensorError> {
        self.is_high().map_err(|_| SensorError::Io)
    }
}
