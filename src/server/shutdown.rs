// Shutdown signal module
// Running -> shutting-down transition shared by the listener, the quit hook and OS signals

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// One-way shutdown flag with async notification
///
/// `request()` may be called any number of times from any task; only the
/// first call wakes waiters.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the listener to stop. Fire-and-forget: returns immediately.
    ///
    /// Returns `true` for the call that actually flipped the flag.
    pub fn request(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        // Register before checking the flag so a concurrent request() is not missed
        let notified = self.notify.notified();
        if self.is_requested() {
            return;
        }
        notified.await;
    }
}
