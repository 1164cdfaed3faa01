//! Safety checks
//!
//! - [`jam`]: displacement check after elevator and flipper moves
//! - [`cancel`]: cooperative cancellation between physical operations

pub mod cancel;
pub mod jam;

pub use cancel::{CancelToken, NeverCancel};
pub use jam::{JamCheck, JamDetector};
