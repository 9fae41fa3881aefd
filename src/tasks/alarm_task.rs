//! Alarm polling background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::{
    error::TimerError, ports::AlarmScheduler, schedule::AlarmPlan, state::AppState,
    utils::now_millis,
};

/// Poll the alarm facility and deliver a tick for every due timer.
///
/// Each tick runs on its own task so one slow timer never delays another;
/// the scheduler serializes ticks for the same id.
pub async fn alarm_task(state: Arc<AppState>, poll: Duration) {
    info!("Starting alarm task, polling every {:?}", poll);

    let mut ticker = interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let now = now_millis();

        for id in state.alarms.due(now) {
            debug!(timer = id, "Alarm due");
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                match state.scheduler.tick(id, now).await {
                    Ok(_) => {}
                    Err(TimerError::NotFound(_)) => {
                        warn!(timer = id, "Dropping alarm of removed timer");
                        if let Err(e) = state.alarms.schedule(id, &AlarmPlan::Cancel) {
                            error!(timer = id, "Failed to drop alarm: {}", e);
                        }
                    }
                    Err(e) => error!(timer = id, "Tick failed: {}", e),
                }
            });
        }
    }
}
