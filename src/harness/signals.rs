//! Shared shutdown signal
//!
//! The only state that crosses thread boundaries. Write-once-then-read-only:
//! the coordinator sets it on deadline expiry and it is never cleared.
//! Workers observe it between operations only, never mid-I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Process-wide cooperative shutdown flag.
pub struct ShutdownSignal {
    shutdown: AtomicBool,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
        }
    }

    /// Raise the signal. Idempotent; the flag is never cleared.
    pub fn set(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check whether shutdown has been signaled.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Sleep for `window`, polling the signal every `poll` so a shutdown
    /// raised mid-backoff is honored promptly. Returns true if the signal
    /// was observed before the window elapsed.
    pub fn wait_interruptible(&self, window: Duration, poll: Duration) -> bool {
        let deadline = Instant::now() + window;
        loop {
            if self.is_set() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            std::thread::sleep(poll.min(remaining));
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
