//! Touch sensor monitoring
//!
//! Polls the button every 10 ms. A press while the controller waits for
//! start releases it; any other press cancels the session. The button must
//! be released before another press counts.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cranecuber_hal::TouchSensor;

use crate::signals::SessionSignals;

/// Poll interval
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Rising-edge detection
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    waiting_for_release: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one reading; returns `true` on a new press
    pub fn update(&mut self, pressed: bool) -> bool {
        if pressed {
            let edge = !self.waiting_for_release;
            self.waiting_for_release = true;
            edge
        } else {
            if self.waiting_for_release {
                log::debug!("touch sensor released");
            }
            self.waiting_for_release = false;
            false
        }
    }
}

/// Handle one press
fn on_press(signals: &SessionSignals) {
    if signals.start_pressed() {
        log::info!("touch sensor pressed, starting");
    } else {
        log::warn!("touch sensor pressed, cancelling");
        signals.request_cancel();
    }
}

/// Start the watcher thread
///
/// The thread exits once the session is cancelled.
pub fn spawn_touch_monitor<S>(mut sensor: S, signals: Arc<SessionSignals>) -> io::Result<JoinHandle<()>>
where
    S: TouchSensor + Send + 'static,
{
    thread::Builder::new()
        .name("touch-monitor".to_string())
        .spawn(move || {
            log::info!("Touch monitor started");
            let mut edges = EdgeDetector::new();
            let mut read_failed = false;

            while !signals.is_cancelled() {
                match sensor.is_pressed() {
                    Ok(pressed) => {
                        read_failed = false;
                        if edges.update(pressed) {
                            on_press(&signals);
                        }
                    }
                    Err(e) => {
                        if !read_failed {
                            log::warn!("touch sensor: {}", e);
                        }
                        read_failed = true;
                    }
                }
                thread::sleep(POLL_INTERVAL);
            }
            log::debug!("Touch monitor stopped");
        })
}
