//! Process signal watcher
//!
//! SIGINT and SIGTERM cancel the session so the robot is shut down in an
//! orderly way instead of being killed mid-move. Runs a current-thread
//! tokio runtime on a dedicated thread.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::runtime::Builder;

use crate::signals::SessionSignals;

/// Start the watcher thread
///
/// The thread lives until the process exits.
pub fn spawn_signal_watcher(signals: Arc<SessionSignals>) -> io::Result<JoinHandle<()>> {
    let runtime = Builder::new_current_thread().enable_all().build()?;

    thread::Builder::new()
        .name("signal-watcher".to_string())
        .spawn(move || {
            let interrupts = Arc::clone(&signals);
            runtime.spawn(async move {
                loop {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::warn!("cannot listen for SIGINT: {}", e);
                        return;
                    }
                    if interrupts.is_cancelled() {
                        log::warn!("SIGINT: already shutting down");
                    } else {
                        log::warn!("SIGINT: cancelling");
                        interrupts.request_cancel();
                    }
                }
            });

            runtime.block_on(wait_for_terminate(signals));
        })
}

#[cfg(unix)]
async fn wait_for_terminate(signals: Arc<SessionSignals>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            log::warn!("cannot listen for SIGTERM: {}", e);
            return std::future::pending().await;
        }
    };
    while terminate.recv().await.is_some() {
        log::warn!("SIGTERM: cancelling");
        signals.request_cancel();
    }
}

#[cfg(not(unix))]
async fn wait_for_terminate(_signals: Arc<SessionSignals>) {
    std::future::pending().await
}
