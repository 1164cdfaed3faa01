//! sysfs attribute access
//!
//! ev3dev exposes every device as a directory of small text files. Each
//! read or write is a single syscall on an already-known path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// sysfs root for tacho motors
pub const TACHO_MOTOR_CLASS: &str = "/sys/class/tacho-motor";

/// sysfs root for LEGO sensors
pub const LEGO_SENSOR_CLASS: &str = "/sys/class/lego-sensor";

/// A device directory under a sysfs class
#[derive(Debug, Clone)]
pub struct Device {
    path: PathBuf,
}

impl Device {
    /// Wrap an existing device directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Find the device in `class_dir` whose `address` attribute equals `address`
    pub fn find(class_dir: impl AsRef<Path>, address: &str) -> io::Result<Self> {
        for entry in fs::read_dir(class_dir.as_ref())? {
            let path = entry?.path();
            let Ok(found) = fs::read_to_string(path.join("address")) else {
                continue;
            };
            if found.trim() == address {
                log::debug!("{} found at {}", address, path.display());
                return Ok(Self { path });
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no device at {} in {}", address, class_dir.as_ref().display()),
        ))
    }

    /// Device directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read an attribute as a trimmed string
    pub fn read_str(&self, attr: &str) -> io::Result<String> {
        Ok(fs::read_to_string(self.path.join(attr))?.trim().to_string())
    }

    /// Read an integer attribute
    pub fn read_int(&self, attr: &str) -> io::Result<i32> {
        let raw = self.read_str(attr)?;
        raw.parse()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, format!("{attr}={raw}")))
    }

    /// Write an attribute
    pub fn write(&self, attr: &str, value: impl ToString) -> io::Result<()> {
        fs::write(self.path.join(attr), value.to_string())
    }
}
