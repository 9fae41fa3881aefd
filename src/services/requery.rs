//! Outbound "conditions changed" channel

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::ports::RequeryPort;

/// One request for external consumers to re-read timer conditions
#[derive(Debug, Clone, Serialize)]
pub struct RequeryEvent {
    pub seq: u64,
    pub at: DateTime<Utc>,
}

/// Broadcasts requery requests to any number of subscribers
#[derive(Debug)]
pub struct RequeryChannel {
    tx: broadcast::Sender<RequeryEvent>,
    sent: AtomicU64,
}

impl RequeryChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            sent: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RequeryEvent> {
        self.tx.subscribe()
    }

    /// Requests issued so far, including those nobody received
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

impl RequeryPort for RequeryChannel {
    fn request_requery(&self) {
        let seq = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        // no subscribers is fine, the request is fire-and-forget
        if self.tx.send(RequeryEvent { seq, at: Utc::now() }).is_err() {
            debug!(seq, "requery requested with no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_without_subscribers() {
        let channel = RequeryChannel::new(4);
        channel.request_requery();
        channel.request_requery();
        assert_eq!(channel.sent(), 2);
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let channel = RequeryChannel::new(4);
        let mut rx = channel.subscribe();
        channel.request_requery();
        channel.request_requery();
        assert_eq!(rx.recv().await.unwrap().seq, 1);
        assert_eq!(rx.recv().await.unwrap().seq, 2);
    }
}
