//! EV3 brick port names

use std::fmt;
use std::str::FromStr;

/// Motor output port (A-D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPort {
    A,
    B,
    C,
    D,
}

/// Sensor input port (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPort {
    In1,
    In2,
    In3,
    In4,
}

/// Port name could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown port '{0}'")]
pub struct UnknownPort(pub String);

impl OutputPort {
    /// sysfs `address` attribute value for this port
    pub fn address(self) -> &'static str {
        match self {
            OutputPort::A => "ev3-ports:outA",
            OutputPort::B => "ev3-ports:outB",
            OutputPort::C => "ev3-ports:outC",
            OutputPort::D => "ev3-ports:outD",
        }
    }
}

impl InputPort {
    /// sysfs `address` attribute value for this port
    pub fn address(self) -> &'static str {
        match self {
            InputPort::In1 => "ev3-ports:in1",
            InputPort::In2 => "ev3-ports:in2",
            InputPort::In3 => "ev3-ports:in3",
            InputPort::In4 => "ev3-ports:in4",
        }
    }
}

impl FromStr for OutputPort {
    type Err = UnknownPort;

    /// Accepts `A`, `outA` or the full `ev3-ports:outA` address
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("ev3-ports:").unwrap_or(name);
        let name = name.strip_prefix("out").unwrap_or(name);
        match name.to_ascii_uppercase().as_str() {
            "A" => Ok(OutputPort::A),
            "B" => Ok(OutputPort::B),
            "C" => Ok(OutputPort::C),
            "D" => Ok(OutputPort::D),
            _ => Err(UnknownPort(s.to_string())),
        }
    }
}

impl FromStr for InputPort {
    type Err = UnknownPort;

    /// Accepts `1`, `in1` or the full `ev3-ports:in1` address
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("ev3-ports:").unwrap_or(name);
        let name = name.strip_prefix("in").unwrap_or(name);
        match name {
            "1" => Ok(InputPort::In1),
            "2" => Ok(InputPort::In2),
            "3" => Ok(InputPort::In3),
            "4" => Ok(InputPort::In4),
            _ => Err(UnknownPort(s.to_string())),
        }
    }
}

impl fmt::Display for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}

impl fmt::Display for InputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}
