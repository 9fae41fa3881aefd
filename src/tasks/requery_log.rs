//! Requery broadcast observer

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Log every requery request until the channel closes
pub async fn requery_log_task(state: Arc<AppState>) {
    info!("Starting requery log task");

    let mut rx = state.requery.subscribe();
    drop(state);

    loop {
        match rx.recv().await {
            Ok(event) => debug!(seq = event.seq, at = %event.at, "Conditions changed, requery requested"),
            Err(RecvError::Lagged(skipped)) => warn!("Requery log lagged, skipped {} events", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}
