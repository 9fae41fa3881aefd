//! Main application state shared by the HTTP layer and background tasks

use std::{sync::Arc, time::{Duration, Instant}};

use super::{Collaborators, Scheduler};
use crate::{
    error::StoreError,
    schedule::{Notification, Zone},
    services::{AlarmRegistry, JsonFileStore, LogNotifier, RequeryChannel, WakeLock},
};

/// Capacity of the requery broadcast; slow subscribers skip older events
const REQUERY_CAPACITY: usize = 64;

/// The scheduler plus the concrete collaborators the daemon runs with
pub struct AppState {
    pub scheduler: Scheduler,
    pub alarms: Arc<AlarmRegistry>,
    pub notifier: Arc<LogNotifier>,
    pub requery: Arc<RequeryChannel>,
    pub store: Arc<JsonFileStore>,
    pub wake: WakeLock,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Wire the in-process collaborators around a store
    pub fn new(store: JsonFileStore, zone: Zone, wake_hold: Duration, host: String, port: u16) -> Self {
        let alarms = Arc::new(AlarmRegistry::new());
        let notifier = Arc::new(LogNotifier::new());
        let requery = Arc::new(RequeryChannel::new(REQUERY_CAPACITY));
        let store = Arc::new(store);
        let wake = WakeLock::new();

        let ports = Collaborators {
            alarms: alarms.clone(),
            notifier: notifier.clone(),
            requery: requery.clone(),
            store: store.clone(),
        };

        Self {
            scheduler: Scheduler::new(ports, zone, wake.clone(), wake_hold),
            alarms,
            notifier,
            requery,
            store,
            wake,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Open the timer file at `path` and build the state around it
    pub fn open(
        path: &std::path::Path,
        zone: Zone,
        wake_hold: Duration,
        host: String,
        port: u16,
    ) -> Result<Self, StoreError> {
        Ok(Self::new(JsonFileStore::open(path)?, zone, wake_hold, host, port))
    }

    pub fn active_notifications(&self) -> Vec<Notification> {
        self.notifier.active()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
