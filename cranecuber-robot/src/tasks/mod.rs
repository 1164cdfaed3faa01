//! Background watchers
//!
//! Each watcher runs on its own thread and talks to the controller only
//! through [`SessionSignals`](crate::signals::SessionSignals).

pub mod signals;
pub mod touch_monitor;

pub use signals::spawn_signal_watcher;
pub use touch_monitor::spawn_touch_monitor;
