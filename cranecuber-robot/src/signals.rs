//! Flags shared between the controller and the watcher threads
//!
//! - `cancelled`: set by the touch sensor or a signal, polled by the engine
//!   between moves and between scanned faces
//! - `waiting`: set while the controller waits for the start press; the
//!   touch watcher clears it and wakes the controller

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use cranecuber_core::safety::CancelToken;

#[derive(Debug, Default)]
pub struct SessionSignals {
    cancelled: AtomicBool,
    waiting: Mutex<bool>,
    wake: Condvar,
}

impl SessionSignals {
    pub fn new() -> Self {
        Self::default()
    }

    fn waiting(&self) -> MutexGuard<'_, bool> {
        self.waiting.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask the session to stop, waking a controller blocked on start
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _guard = self.waiting();
        self.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Check if the controller is blocked waiting for the start press
    #[cfg(test)]
    pub fn is_waiting(&self) -> bool {
        *self.waiting()
    }

    /// Block until the start press or a cancellation
    ///
    /// Returns `true` when started, `false` when cancelled.
    pub fn wait_for_start(&self) -> bool {
        let mut waiting = self.waiting();
        *waiting = true;
        while *waiting && !self.is_cancelled() {
            waiting = self
                .wake
                .wait(waiting)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *waiting = false;
        !self.is_cancelled()
    }

    /// Release a controller waiting for start
    ///
    /// Returns `false` if nothing was waiting.
    pub fn start_pressed(&self) -> bool {
        let mut waiting = self.waiting();
        if !*waiting {
            return false;
        }
        *waiting = false;
        self.wake.notify_all();
        true
    }
}

impl CancelToken for SessionSignals {
    fn is_cancelled(&self) -> bool {
        SessionSignals::is_cancelled(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn wait_until_waiting(signals: &SessionSignals) {
        while !signals.is_waiting() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_start_press_wakes_controller() {
        let signals = Arc::new(SessionSignals::new());
        let controller = {
            let signals = Arc::clone(&signals);
            thread::spawn(move || signals.wait_for_start())
        };

        wait_until_waiting(&signals);
        assert!(signals.start_pressed());
        assert!(controller.join().unwrap());
        assert!(!signals.is_waiting());
        assert!(!signals.is_cancelled());
    }

    #[test]
    fn test_cancel_wakes_controller() {
        let signals = Arc::new(SessionSignals::new());
        let controller = {
            let signals = Arc::clone(&signals);
            thread::spawn(move || signals.wait_for_start())
        };

        wait_until_waiting(&signals);
        signals.request_cancel();
        assert!(!controller.join().unwrap());
    }

    #[test]
    fn test_press_without_waiter() {
        let signals = SessionSignals::new();
        assert!(!signals.start_pressed());
        assert!(!CancelToken::is_cancelled(&signals));
    }

    #[test]
    fn test_cancelled_before_wait() {
        let signals = SessionSignals::new();
        signals.request_cancel();
        assert!(!signals.wait_for_start());
    }
}
