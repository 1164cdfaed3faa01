//! Vision/solver daemon client
//!
//! One TCP connection per request: send the framed command, read until the
//! daemon closes the connection. Emulated runs use [`EmulatedVision`]
//! instead, which answers from `[emulate]`.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use cranecuber_core::orientation::FaceLabel;
use cranecuber_core::scan::FaceCamera;
use cranecuber_core::CollaboratorError;
use cranecuber_protocol::{Command, Response, PING_REPLY};

use crate::config::{EmulateConfig, ServerConfig};
use crate::error::AppError;

/// Per-square RGB values keyed by square index
pub type RgbColors = Map<String, Value>;

/// Camera and solver services the session needs
pub trait Vision: FaceCamera {
    /// RGB values of every square seen so far
    fn rgb_colors(&mut self) -> Result<RgbColors, AppError>;

    /// Resolve RGB values to a cube state string
    fn cube_state(&mut self, colors: &RgbColors) -> Result<String, AppError>;

    /// Move list solving `state`
    fn solution(&mut self, state: &str) -> Result<String, AppError>;
}

/// Reply to `GET_CUBE_STATE`
#[derive(Debug, Deserialize)]
struct CubeStateReply {
    kociemba: String,
}

/// Client for the daemon on the camera host
#[derive(Debug, Clone)]
pub struct DaemonClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout(),
        }
    }

    fn connect(&self) -> Result<TcpStream, AppError> {
        let mut last_error = None;
        for addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address for daemon host"))
            .into())
    }

    /// Send one command and return the reply text
    pub fn request(&self, command: Command<'_>) -> Result<String, AppError> {
        let frame = command.to_frame()?;
        let bytes = frame.encode_to_vec()?;

        let mut stream = self.connect()?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.write_all(&bytes)?;
        log::info!("TXed {} to daemon", command.name());

        let mut raw = Vec::new();
        if let Err(e) = stream.read_to_end(&mut raw) {
            return Err(match e.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                    AppError::Timeout(self.timeout.as_secs())
                }
                _ => e.into(),
            });
        }

        let text = String::from_utf8_lossy(&raw);
        log::debug!("RXed {} byte response", raw.len());
        match Response::parse(&text) {
            Response::Reply(reply) => Ok(reply.to_string()),
            Response::Error(message) => Err(AppError::Daemon(message.to_string())),
        }
    }

    /// Check the daemon is up
    pub fn ping(&self) -> Result<(), AppError> {
        let reply = self.request(Command::Ping)?;
        if reply == PING_REPLY {
            Ok(())
        } else {
            Err(AppError::Daemon(format!("unexpected ping reply '{}'", reply)))
        }
    }
}

impl FaceCamera for DaemonClient {
    fn capture(&mut self, face: FaceLabel) -> Result<(), CollaboratorError> {
        self.request(Command::TakePicture(face.as_char()))
            .map(|_| ())
            .map_err(|e| {
                log::error!("capturing {}: {}", face, e);
                CollaboratorError::ScanUnavailable
            })
    }
}

impl Vision for DaemonClient {
    fn rgb_colors(&mut self) -> Result<RgbColors, AppError> {
        let reply = self.request(Command::GetRgbColors)?;
        if reply.is_empty() {
            return Err(AppError::Daemon("GET_RGB_COLORS returned no output".to_string()));
        }
        Ok(serde_json::from_str(&reply)?)
    }

    fn cube_state(&mut self, colors: &RgbColors) -> Result<String, AppError> {
        let json = serde_json::to_string(colors)?;
        let reply = self.request(Command::GetCubeState(&json))?;
        parse_cube_state(&reply)
    }

    fn solution(&mut self, state: &str) -> Result<String, AppError> {
        self.request(Command::GetSolution(state))
    }
}

/// Extract the solver state from a `GET_CUBE_STATE` reply
fn parse_cube_state(reply: &str) -> Result<String, AppError> {
    let reply: CubeStateReply = serde_json::from_str(reply)?;
    Ok(reply.kociemba)
}

/// Camera and solver stand-in for `--emulate`
#[derive(Debug, Clone)]
pub struct EmulatedVision {
    size: u8,
    solution: String,
    captured: Vec<FaceLabel>,
}

impl EmulatedVision {
    pub fn new(config: &EmulateConfig) -> Self {
        Self {
            size: config.size,
            solution: config.solution.clone(),
            captured: Vec::new(),
        }
    }

    /// Faces captured so far
    #[cfg(test)]
    pub fn captured(&self) -> &[FaceLabel] {
        &self.captured
    }
}

impl FaceCamera for EmulatedVision {
    fn capture(&mut self, face: FaceLabel) -> Result<(), CollaboratorError> {
        log::info!("emulated capture of {}", face);
        self.captured.push(face);
        Ok(())
    }
}

impl Vision for EmulatedVision {
    fn rgb_colors(&mut self) -> Result<RgbColors, AppError> {
        let squares = 6 * usize::from(self.size) * usize::from(self.size);
        Ok((1..=squares)
            .map(|index| (index.to_string(), Value::from(vec![0u8, 0, 0])))
            .collect())
    }

    fn cube_state(&mut self, _colors: &RgbColors) -> Result<String, AppError> {
        Ok("emulated".to_string())
    }

    fn solution(&mut self, _state: &str) -> Result<String, AppError> {
        Ok(self.solution.clone())
    }
}
