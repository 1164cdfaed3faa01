//! Move list compression
//!
//! Some solvers spell a half turn as two quarter turns (`U U`) and a
//! counter-clockwise turn as three. Every physical turn costs a rotate and
//! a squish, so runs of identical clockwise quarter turns are merged.

use heapless::Vec;

use super::notation::{MoveList, MoveSpec};
use crate::error::MoveError;

/// Merge runs of identical clockwise quarter turns
///
/// A run of two becomes a half turn, three one counter-clockwise turn, and
/// four cancel out.
pub fn compress_moves(moves: &[MoveSpec]) -> Result<MoveList, MoveError> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < moves.len() {
        let first = moves[i];
        let mergeable = |m: &MoveSpec| m.clockwise && m.quarter_turns == 1 && m.same_layers(&first);

        let run = if mergeable(&first) {
            moves[i..].iter().take_while(|m| mergeable(*m)).count()
        } else {
            1
        };

        let merged = match (mergeable(&first), run % 4) {
            (false, _) => Some(first),
            (true, 0) => None,
            (true, 1) => Some(first),
            (true, 2) => Some(MoveSpec {
                quarter_turns: 2,
                ..first
            }),
            (true, _) => Some(MoveSpec {
                clockwise: false,
                ..first
            }),
        };
        if let Some(spec) = merged {
            out.push(spec).map_err(|_| MoveError::TooManyMoves)?;
        }
        i += run;
    }

    if out.len() < moves.len() {
        log::debug!("compressed {} moves to {}", moves.len(), out.len());
    }
    Ok(out)
}
