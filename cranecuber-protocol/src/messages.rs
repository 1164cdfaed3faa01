//! Requests and responses for the daemon protocol
//!
//! Requests are framed text commands, some with an argument after a colon.
//! Responses are unframed text; the daemon closes the connection when done.

use core::fmt::Write;

use heapless::String;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

/// TCP port the daemon listens on
pub const DEFAULT_PORT: u16 = 10000;

/// Daemon answer to [`Command::Ping`]
pub const PING_REPLY: &str = "REPLY";

/// Prefix of every failed response
pub const ERROR_PREFIX: &str = "ERROR";

// Command names
const CMD_PING: &str = "PING";
const CMD_TAKE_PICTURE: &str = "TAKE_PICTURE";
const CMD_GET_RGB_COLORS: &str = "GET_RGB_COLORS";
const CMD_GET_CUBE_STATE: &str = "GET_CUBE_STATE";
const CMD_GET_SOLUTION: &str = "GET_SOLUTION";

/// Requests from the robot to the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Liveness check, answered with [`PING_REPLY`]
    Ping,
    /// Photograph the face currently facing the camera
    TakePicture(char),
    /// Extract per-square RGB values from the six photos
    ///
    /// Reply is a JSON object of square index to `[r, g, b]`.
    GetRgbColors,
    /// Resolve RGB values (JSON) to a cube state
    ///
    /// Reply is a JSON object with the state under `kociemba`.
    GetCubeState(&'a str),
    /// Solve a cube state; reply is a whitespace-separated move list
    GetSolution(&'a str),
}

impl<'a> Command<'a> {
    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut text = String::<MAX_PAYLOAD_SIZE>::new();
        let written = match self {
            Command::Ping => text.push_str(CMD_PING),
            Command::TakePicture(face) => write!(text, "{CMD_TAKE_PICTURE}:{face}").map_err(|_| ()),
            Command::GetRgbColors => text.push_str(CMD_GET_RGB_COLORS),
            Command::GetCubeState(json) => {
                write!(text, "{CMD_GET_CUBE_STATE}:{json}").map_err(|_| ())
            }
            Command::GetSolution(state) => write!(text, "{CMD_GET_SOLUTION}:{state}").map_err(|_| ()),
        };
        written.map_err(|_| FrameError::PayloadTooLarge)?;
        Frame::new(text.as_bytes())
    }

    /// Parse a command from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let text = frame.as_str()?;
        let (name, argument) = match text.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (text, None),
        };

        match (name, argument) {
            (CMD_PING, None) => Ok(Command::Ping),
            (CMD_GET_RGB_COLORS, None) => Ok(Command::GetRgbColors),
            (CMD_TAKE_PICTURE, Some(face)) => {
                let mut chars = face.trim().chars();
                match (chars.next(), chars.next()) {
                    (Some(face), None) => Ok(Command::TakePicture(face)),
                    _ => Err(FrameError::UnknownCommand),
                }
            }
            (CMD_GET_CUBE_STATE, Some(json)) => Ok(Command::GetCubeState(json)),
            (CMD_GET_SOLUTION, Some(state)) => Ok(Command::GetSolution(state)),
            _ => Err(FrameError::UnknownCommand),
        }
    }

    /// Command name as sent on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => CMD_PING,
            Command::TakePicture(_) => CMD_TAKE_PICTURE,
            Command::GetRgbColors => CMD_GET_RGB_COLORS,
            Command::GetCubeState(_) => CMD_GET_CUBE_STATE,
            Command::GetSolution(_) => CMD_GET_SOLUTION,
        }
    }
}

/// A daemon response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'a> {
    /// Successful reply text, surrounding whitespace removed
    Reply(&'a str),
    /// Failure message, including the `ERROR` prefix
    Error(&'a str),
}

impl<'a> Response<'a> {
    /// Classify raw response text
    pub fn parse(text: &'a str) -> Self {
        if text.starts_with(ERROR_PREFIX) {
            Response::Error(text.trim_end())
        } else {
            Response::Reply(text.trim())
        }
    }

    /// Reply text, or the error message
    pub fn into_result(self) -> Result<&'a str, &'a str> {
        match self {
            Response::Reply(text) => Ok(text),
            Response::Error(message) => Err(message),
        }
    }

    /// Check if this answers a ping
    pub fn is_ping_reply(&self) -> bool {
        matches!(self, Response::Reply(PING_REPLY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameParser;

    fn roundtrip(command: Command<'_>) {
        let encoded = command.to_frame().unwrap().encode_to_vec().unwrap();
        let mut parser = FrameParser::new();
        let frame = parser.feed_bytes(&encoded).unwrap().unwrap();
        assert_eq!(Command::from_frame(&frame).unwrap(), command);
    }

    #[test]
    fn test_command_wire_text() {
        let frame = Command::TakePicture('F').to_frame().unwrap();
        assert_eq!(frame.as_str(), Ok("TAKE_PICTURE:F"));

        let frame = Command::Ping.to_frame().unwrap();
        assert_eq!(frame.as_str(), Ok("PING"));

        let frame = Command::GetSolution("UUUUUUUUURRRRRRRRR").to_frame().unwrap();
        assert_eq!(frame.as_str(), Ok("GET_SOLUTION:UUUUUUUUURRRRRRRRR"));
    }

    #[test]
    fn test_every_command_roundtrips() {
        roundtrip(Command::Ping);
        roundtrip(Command::TakePicture('U'));
        roundtrip(Command::GetRgbColors);
        roundtrip(Command::GetCubeState("{\"1\": [12, 130, 117]}"));
        roundtrip(Command::GetSolution("DRLUUBFBRBLURRLRUBLRDDFDLFUFUFFDBRDUBRUFLLFDDBFLUBLRBD"));
    }

    #[test]
    fn test_unknown_commands_rejected() {
        for text in ["PONG", "PING:1", "TAKE_PICTURE", "TAKE_PICTURE:FR", "GET_SOLUTION"] {
            let frame = Frame::new(text.as_bytes()).unwrap();
            assert_eq!(
                Command::from_frame(&frame),
                Err(FrameError::UnknownCommand),
                "{text}"
            );
        }
    }

    #[test]
    fn test_oversized_argument() {
        let json = [b'1'; MAX_PAYLOAD_SIZE];
        let json = core::str::from_utf8(&json).unwrap();
        assert_eq!(
            Command::GetCubeState(json).to_frame(),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_response_parse() {
        assert_eq!(Response::parse("REPLY"), Response::Reply("REPLY"));
        assert!(Response::parse("REPLY\n").is_ping_reply());
        assert_eq!(
            Response::parse("  R U R' U'\n").into_result(),
            Ok("R U R' U'")
        );
        assert_eq!(
            Response::parse("ERROR: image rubiks-side-F.png is 0 bytes\n").into_result(),
            Err("ERROR: image rubiks-side-F.png is 0 bytes")
        );
    }
}
