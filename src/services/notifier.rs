//! Notification facility that logs and tracks what is on screen

use std::{collections::BTreeMap, sync::Mutex};

use tracing::info;

use crate::{
    error::TimerError,
    ports::Notifier,
    schedule::Notification,
    state::TimerId,
};

/// Keeps the currently shown notification per timer
#[derive(Debug, Default)]
pub struct LogNotifier {
    active: Mutex<BTreeMap<TimerId, Notification>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the shown notifications, ordered by timer id
    pub fn active(&self) -> Vec<Notification> {
        self.active
            .lock()
            .map(|active| active.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(
        &self,
        id: TimerId,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<TimerId, Notification>>, TimerError> {
        self.active.lock().map_err(|e| TimerError::Notify {
            id,
            message: format!("Failed to lock notifications: {}", e),
        })
    }
}

impl Notifier for LogNotifier {
    fn show(&self, notification: &Notification) -> Result<(), TimerError> {
        info!(
            timer = notification.id,
            tone = notification.tone.as_deref().unwrap_or("silent"),
            led = notification.use_led,
            "Notification: {}",
            notification.text
        );
        self.lock(notification.id)?
            .insert(notification.id, notification.clone());
        Ok(())
    }

    fn cancel(&self, id: TimerId) -> Result<(), TimerError> {
        if self.lock(id)?.remove(&id).is_some() {
            info!(timer = id, "Notification cleared");
        }
        Ok(())
    }
}
