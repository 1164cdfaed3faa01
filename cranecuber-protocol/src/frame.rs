//! Request framing for the daemon protocol
//!
//! Frame format:
//! - START: the ASCII marker `<START>`
//! - PAYLOAD (0-16384 bytes): command text, must not contain either marker
//! - END: the ASCII marker `<END>`
//!
//! There is no length field or checksum; TCP carries the bytes intact and
//! the markers delimit the request.

use heapless::Vec;

/// Frame start marker
pub const FRAME_START: &[u8] = b"<START>";

/// Frame end marker
pub const FRAME_END: &[u8] = b"<END>";

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 16384;

/// Maximum complete frame size (START + MAX_PAYLOAD + END)
pub const MAX_FRAME_SIZE: usize = FRAME_START.len() + MAX_PAYLOAD_SIZE + FRAME_END.len();

/// Payload plus a trailing end marker
const PARSE_BUFFER_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_END.len();

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    #[error("payload too large")]
    PayloadTooLarge,
    /// Payload contains `<START>` or `<END>`
    #[error("payload contains a frame marker")]
    MarkerInPayload,
    /// A new start marker arrived before the end marker
    #[error("frame truncated by a new start marker")]
    Truncated,
    /// Payload is not UTF-8 text
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
    /// Payload does not name a known command
    #[error("unknown command")]
    UnknownCommand,
    /// Buffer too small for encoding
    #[error("buffer too small for frame")]
    BufferTooSmall,
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given payload
    pub fn new(payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        if contains(payload, FRAME_START) || contains(payload, FRAME_END) {
            return Err(FrameError::MarkerInPayload);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            payload: payload_vec,
        })
    }

    /// Payload as text
    pub fn as_str(&self) -> Result<&str, FrameError> {
        core::str::from_utf8(&self.payload).map_err(|_| FrameError::InvalidUtf8)
    }

    /// Number of bytes [`Frame::encode`] writes
    pub fn encoded_len(&self) -> usize {
        FRAME_START.len() + self.payload.len() + FRAME_END.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let payload_end = FRAME_START.len() + self.payload.len();
        buffer[..FRAME_START.len()].copy_from_slice(FRAME_START);
        buffer[FRAME_START.len()..payload_end].copy_from_slice(&self.payload);
        buffer[payload_end..frame_len].copy_from_slice(FRAME_END);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut vec = Vec::new();
        for part in [FRAME_START, &self.payload[..], FRAME_END] {
            vec.extend_from_slice(part)
                .map_err(|_| FrameError::BufferTooSmall)?;
        }
        Ok(vec)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    /// Bytes of the start marker matched so far
    matched: usize,
    buffer: Vec<u8, PARSE_BUFFER_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Matching the start marker
    WaitingForStart,
    /// Reading payload bytes until the end marker
    ReadingPayload,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            matched: 0,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.matched = 0;
        self.buffer.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START[self.matched] {
                    self.matched += 1;
                    if self.matched == FRAME_START.len() {
                        self.matched = 0;
                        self.buffer.clear();
                        self.state = ParseState::ReadingPayload;
                    }
                } else {
                    // '<' only opens the marker, so a mismatch restarts the match
                    self.matched = usize::from(byte == FRAME_START[0]);
                }
                Ok(None)
            }
            ParseState::ReadingPayload => {
                if self.buffer.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }

                if self.buffer.ends_with(FRAME_END) {
                    let len = self.buffer.len() - FRAME_END.len();
                    let frame = Frame::new(&self.buffer[..len]);
                    self.reset();
                    return frame.map(Some);
                }

                if self.buffer.ends_with(FRAME_START) {
                    // Keep reading: the new marker opened the next frame
                    self.buffer.clear();
                    return Err(FrameError::Truncated);
                }

                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::new(b"").unwrap();
        let mut buffer = [0u8; 16];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 12);
        assert_eq!(&buffer[..len], b"<START><END>");
    }

    #[test]
    fn test_frame_encode_with_payload() {
        let frame = Frame::new(b"TAKE_PICTURE:F").unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(&encoded[..], b"<START>TAKE_PICTURE:F<END>");
        assert_eq!(encoded.len(), frame.encoded_len());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(b"PING").unwrap();
        let mut buffer = [0u8; 10];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_frame_roundtrip() {
        let original = Frame::new(b"GET_SOLUTION:UUUUUUUUU").unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let parsed = parser.feed_bytes(&encoded).unwrap().unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.as_str(), Ok("GET_SOLUTION:UUUUUUUUU"));
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let mut parser = FrameParser::new();
        let parsed = parser
            .feed_bytes(b"\x00xx<<STA<START>PING<END>")
            .unwrap()
            .unwrap();

        assert_eq!(parsed.as_str(), Ok("PING"));
    }

    #[test]
    fn test_parser_truncated_frame_restarts() {
        let mut parser = FrameParser::new();
        assert_eq!(
            parser.feed_bytes(b"<START>TAKE_PIC<START>"),
            Err(FrameError::Truncated)
        );
        let parsed = parser.feed_bytes(b"PING<END>").unwrap().unwrap();
        assert_eq!(parsed.as_str(), Ok("PING"));
    }

    #[test]
    fn test_parser_back_to_back_frames() {
        let mut parser = FrameParser::new();
        let data = b"<START>PING<END><START>GET_RGB_COLORS<END>";
        let first = parser.feed_bytes(&data[..16]).unwrap().unwrap();
        let second = parser.feed_bytes(&data[16..]).unwrap().unwrap();
        assert_eq!(first.as_str(), Ok("PING"));
        assert_eq!(second.as_str(), Ok("GET_RGB_COLORS"));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [b'a'; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(&large_payload), Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_parser_rejects_oversized_payload() {
        let mut parser = FrameParser::new();
        parser.feed_bytes(FRAME_START).unwrap();
        let large_payload = [b'a'; MAX_PAYLOAD_SIZE + FRAME_END.len() + 1];
        assert_eq!(
            parser.feed_bytes(&large_payload),
            Err(FrameError::PayloadTooLarge)
        );

        // Parser is usable again afterwards
        let parsed = parser.feed_bytes(b"<START>PING<END>").unwrap().unwrap();
        assert_eq!(parsed.as_str(), Ok("PING"));
    }

    #[test]
    fn test_marker_in_payload_rejected() {
        assert_eq!(Frame::new(b"A<END>B"), Err(FrameError::MarkerInPayload));
        assert_eq!(Frame::new(b"<START>"), Err(FrameError::MarkerInPayload));
    }

    #[test]
    fn test_invalid_utf8() {
        let frame = Frame::new(&[0xff, 0xfe]).unwrap();
        assert_eq!(frame.as_str(), Err(FrameError::InvalidUtf8));
    }

    proptest! {
        #[test]
        fn test_parse_inverts_encode(text in "[A-Za-z0-9_:{}\\[\\], \"]{0,300}") {
            let frame = Frame::new(text.as_bytes()).unwrap();
            let encoded = frame.encode_to_vec().unwrap();
            let mut parser = FrameParser::new();
            let parsed = parser.feed_bytes(&encoded).unwrap().unwrap();
            prop_assert_eq!(parsed.as_str().unwrap(), text.as_str());
        }
    }
}
