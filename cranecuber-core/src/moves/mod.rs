//! Move-list notation
//!
//! Solvers emit whitespace-separated tokens such as `Rw2`, `3Uw'` or
//! `D'`. Whole-cube reorientations (`x`, `y`, `z`) are dropped since the
//! engine tracks orientation itself.

pub mod compress;
pub mod notation;

pub use compress::compress_moves;
pub use notation::{parse_move_list, parse_token, MoveList, MoveSpec, MAX_MOVES};
