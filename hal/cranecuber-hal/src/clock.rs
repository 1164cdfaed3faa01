//! Monotonic time source
//!
//! The engine only needs elapsed milliseconds for its timing statistics,
//! so the clock has a single method.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `start_ms`
    fn elapsed_ms(&self, start_ms: u64) -> u64 {
        self.now_ms().saturating_sub(start_ms)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
