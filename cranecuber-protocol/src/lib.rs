//! Vision/solver daemon protocol
//!
//! The robot talks to a daemon on the camera host over TCP. Each connection
//! carries exactly one request and one response:
//!
//! ```text
//! robot  -> daemon   <START>TAKE_PICTURE:F<END>
//! daemon -> robot    (response text, then close)
//! ```
//!
//! Requests are framed with ASCII markers; the response is raw text read
//! until the daemon closes the connection. A response starting with `ERROR`
//! is a failure.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_END, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{Command, Response, DEFAULT_PORT, PING_REPLY};
