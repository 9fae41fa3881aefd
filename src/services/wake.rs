//! Wake assertion held around notification hand-off

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::time::Instant;
use tracing::debug;

/// How long a wake assertion is kept after a notification hand-off
pub const DEFAULT_WAKE_HOLD: Duration = Duration::from_secs(1);

/// Counts outstanding wake assertions; the host stays awake while any exist
#[derive(Debug, Clone, Default)]
pub struct WakeLock {
    holders: Arc<AtomicUsize>,
}

impl WakeLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> WakeGuard {
        let holders = self.holders.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(holders, "wake assertion acquired");
        WakeGuard {
            holders: Arc::clone(&self.holders),
            acquired_at: Instant::now(),
        }
    }

    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::SeqCst)
    }
}

/// One outstanding wake assertion, released on drop
#[derive(Debug)]
pub struct WakeGuard {
    holders: Arc<AtomicUsize>,
    acquired_at: Instant,
}

impl WakeGuard {
    /// Keep the assertion until `hold` has passed since it was acquired,
    /// without blocking the caller. Requires a running tokio runtime.
    pub fn release_after(self, hold: Duration) {
        let deadline = self.acquired_at + hold;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            drop(self);
        });
    }
}

impl Drop for WakeGuard {
    fn drop(&mut self) {
        let holders = self.holders.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(holders, "wake assertion released");
    }
}
