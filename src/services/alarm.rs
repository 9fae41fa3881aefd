//! In-process alarm facility
//!
//! Holds one repeating trigger per armed timer and reports which ones are
//! due when polled. Missed periods are coalesced into a single trigger.

use std::{collections::BTreeMap, sync::Mutex};

use tracing::debug;

use crate::{
    error::TimerError,
    ports::AlarmScheduler,
    schedule::AlarmPlan,
    state::TimerId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Trigger {
    next_millis: i64,
    period_millis: i64,
}

#[derive(Debug, Default)]
pub struct AlarmRegistry {
    triggers: Mutex<BTreeMap<TimerId, Trigger>>,
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids whose trigger time has passed at `now_millis`.
    ///
    /// Each returned trigger moves to its first period boundary after
    /// `now_millis`, so a long gap yields one trigger, not a burst.
    pub fn due(&self, now_millis: i64) -> Vec<TimerId> {
        let Ok(mut triggers) = self.triggers.lock() else {
            return Vec::new();
        };
        let mut due = Vec::new();
        for (&id, trigger) in triggers.iter_mut() {
            if trigger.next_millis > now_millis {
                continue;
            }
            let period = trigger.period_millis.max(1);
            let missed = (now_millis - trigger.next_millis) / period;
            trigger.next_millis += (missed + 1) * period;
            due.push(id);
        }
        due
    }

    /// Next trigger time for `id`, if armed
    pub fn next_trigger(&self, id: TimerId) -> Option<i64> {
        self.triggers.lock().ok()?.get(&id).map(|t| t.next_millis)
    }

    pub fn armed_count(&self) -> usize {
        self.triggers.lock().map(|t| t.len()).unwrap_or(0)
    }
}

impl AlarmScheduler for AlarmRegistry {
    fn schedule(&self, id: TimerId, plan: &AlarmPlan) -> Result<(), TimerError> {
        let mut triggers = self.triggers.lock().map_err(|e| TimerError::Alarm {
            id,
            message: format!("Failed to lock alarm registry: {}", e),
        })?;
        match *plan {
            AlarmPlan::RepeatAt { first_millis, period_millis } => {
                debug!(timer = id, first_millis, period_millis, "alarm set");
                triggers.insert(id, Trigger { next_millis: first_millis, period_millis });
            }
            AlarmPlan::Cancel => {
                if triggers.remove(&id).is_some() {
                    debug!(timer = id, "alarm cancelled");
                }
            }
        }
        Ok(())
    }
}
