//! Move token parser
//!
//! Grammar: `[<rows>]<face>[w][2|1]['|’]`
//!
//! - no row prefix means one row, or two with `w`
//! - `2` is a half turn, `1` (or nothing) a quarter turn
//! - a trailing apostrophe turns counter-clockwise

use core::fmt;

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::orientation::FaceLabel;

/// Longest move list accepted in one run
pub const MAX_MOVES: usize = 1024;

/// Parsed move list
pub type MoveList = Vec<MoveSpec, MAX_MOVES>;

/// One parsed move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveSpec {
    /// Face whose layers turn
    pub target_face: FaceLabel,
    /// Number of layers, counted from `target_face`
    pub rows: u8,
    /// 1 or 2
    pub quarter_turns: u8,
    /// Clockwise as seen looking at `target_face`
    pub clockwise: bool,
}

impl MoveSpec {
    /// Create a move
    pub const fn new(target_face: FaceLabel, rows: u8, quarter_turns: u8, clockwise: bool) -> Self {
        Self {
            target_face,
            rows,
            quarter_turns,
            clockwise,
        }
    }

    /// Same face and depth
    pub fn same_layers(&self, other: &MoveSpec) -> bool {
        self.target_face == other.target_face && self.rows == other.rows
    }
}

impl fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rows {
            1 => write!(f, "{}", self.target_face)?,
            2 => write!(f, "{}w", self.target_face)?,
            n => write!(f, "{}{}w", n, self.target_face)?,
        }
        if self.quarter_turns == 2 {
            f.write_str("2")?;
        }
        if !self.clockwise {
            f.write_str("'")?;
        }
        Ok(())
    }
}

/// Parse one token
///
/// Returns `Ok(None)` for whole-cube reorientation markers.
pub fn parse_token(token: &str) -> Result<Option<MoveSpec>, MoveError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(MoveError::Empty);
    }
    if token.starts_with(['x', 'y', 'z']) {
        return Ok(None);
    }

    let (rest, clockwise) = match token.strip_suffix('\'').or_else(|| token.strip_suffix('’')) {
        Some(rest) => (rest, false),
        None => (token, true),
    };
    let (rest, quarter_turns) = if let Some(rest) = rest.strip_suffix('2') {
        (rest, 2)
    } else if let Some(rest) = rest.strip_suffix('1') {
        (rest, 1)
    } else {
        (rest, 1)
    };
    let (rest, wide) = match rest.strip_suffix('w') {
        Some(rest) => (rest, true),
        None => (rest, false),
    };

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let (prefix, face) = rest.split_at(digits);

    let mut chars = face.chars();
    let target_face = match (chars.next(), chars.next()) {
        (Some(c), None) => FaceLabel::from_char(c)?,
        (None, _) => return Err(MoveError::Malformed),
        (Some(_), Some(_)) => return Err(MoveError::Malformed),
    };

    let rows = if prefix.is_empty() {
        if wide {
            2
        } else {
            1
        }
    } else {
        prefix.parse::<u8>().map_err(|_| MoveError::Malformed)?
    };
    if rows == 0 {
        return Err(MoveError::Malformed);
    }

    Ok(Some(MoveSpec {
        target_face,
        rows,
        quarter_turns,
        clockwise,
    }))
}

/// Parse a whitespace-separated move list
pub fn parse_move_list(text: &str) -> Result<MoveList, MoveError> {
    let mut moves = Vec::new();
    for token in text.split_whitespace() {
        if let Some(spec) = parse_token(token)? {
            moves.push(spec).map_err(|_| MoveError::TooManyMoves)?;
        }
    }
    Ok(moves)
}
