//! Cooperative cancellation
//!
//! The control thread polls the token between physical operations, never
//! during one. An in-flight motion always finishes.

use core::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag
pub trait CancelToken {
    /// Check if the session should stop
    fn is_cancelled(&self) -> bool;
}

impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<T: CancelToken + ?Sized> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Token that is never set
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_token() {
        let flag = AtomicBool::new(false);
        assert!(!flag.is_cancelled());
        flag.store(true, Ordering::SeqCst);
        assert!((&flag).is_cancelled());
        assert!(!NeverCancel.is_cancelled());
    }
}
