//! Scheduler: sole owner of every timer's mutable state
//!
//! Each timer sits behind its own async mutex. Ticks and edits for one id
//! run one at a time; different ids proceed independently. A change is
//! committed to memory only after its effects were handed off and, when
//! needed, persisted, so a failed operation can be retried as is.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, error, info, warn};

use super::{Timer, TimerConfig, TimerId};
use crate::{
    error::TimerError,
    ports::{AlarmScheduler, Notifier, RequeryPort, TimerStore},
    schedule::{AlarmPlan, Effect, Notification, NotifyOutcome, Zone},
    services::WakeLock,
};

/// Implementations the scheduler hands its decisions to
#[derive(Clone)]
pub struct Collaborators {
    pub alarms: Arc<dyn AlarmScheduler>,
    pub notifier: Arc<dyn Notifier>,
    pub requery: Arc<dyn RequeryPort>,
    pub store: Arc<dyn TimerStore>,
}

/// What a tick did
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub id: TimerId,
    /// `None` when the tick was suppressed
    pub notification: Option<Notification>,
    pub night: bool,
    pub need_save: bool,
    pub next_fire_millis: i64,
}

pub struct Scheduler {
    timers: RwLock<BTreeMap<TimerId, Arc<Mutex<Timer>>>>,
    next_id: AtomicU64,
    zone: Zone,
    wake: WakeLock,
    wake_hold: Duration,
    ports: Collaborators,
}

impl Scheduler {
    pub fn new(ports: Collaborators, zone: Zone, wake: WakeLock, wake_hold: Duration) -> Self {
        Self {
            timers: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            zone,
            wake,
            wake_hold,
            ports,
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Load persisted timers and re-install their alarms
    pub async fn restore(&self) -> Result<usize, TimerError> {
        let loaded = self.ports.store.load_all()?;
        let mut timers = self.timers.write().await;
        for timer in loaded {
            let id = timer.id();
            self.ports.alarms.schedule(id, &AlarmPlan::for_timer(&timer))?;
            self.next_id.fetch_max(id + 1, Ordering::SeqCst);
            timers.insert(id, Arc::new(Mutex::new(timer)));
        }
        info!("Restored {} timers", timers.len());
        Ok(timers.len())
    }

    /// Add a new disabled timer; the id in `config` is replaced
    pub async fn create(&self, mut config: TimerConfig) -> Result<Timer, TimerError> {
        config.validate()?;
        config.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let timer = Timer::from_config(config);
        self.ports.store.persist(&timer)?;
        self.timers
            .write()
            .await
            .insert(timer.id(), Arc::new(Mutex::new(timer.clone())));
        self.ports.requery.request_requery();
        info!(timer = timer.id(), "Timer created");
        Ok(timer)
    }

    pub async fn get(&self, id: TimerId) -> Result<Timer, TimerError> {
        let timer = self.lock(id).await?;
        Ok(timer.clone())
    }

    pub async fn list(&self) -> Vec<Timer> {
        let slots: Vec<_> = self.timers.read().await.values().cloned().collect();
        let mut timers = Vec::with_capacity(slots.len());
        for slot in slots {
            timers.push(slot.lock().await.clone());
        }
        timers
    }

    /// Delete a timer.
    ///
    /// The stored copy goes first so a failed write leaves the timer fully
    /// in place. Once it is gone, failing to clear the alarm or notification
    /// is only logged; the alarm task drops alarms of unknown timers.
    pub async fn remove(&self, id: TimerId) -> Result<(), TimerError> {
        let _timer = self.lock(id).await?;
        self.ports.store.remove(id)?;
        self.timers.write().await.remove(&id);
        if let Err(e) = self.ports.alarms.schedule(id, &AlarmPlan::Cancel) {
            warn!(timer = id, "Failed to cancel alarm of removed timer: {}", e);
        }
        if let Err(e) = self.ports.notifier.cancel(id) {
            warn!(timer = id, "Failed to clear notification of removed timer: {}", e);
        }
        self.ports.requery.request_requery();
        info!(timer = id, "Timer removed");
        Ok(())
    }

    /// Replace a timer's settings, keeping its id and scheduling fields
    pub async fn update_config(&self, id: TimerId, mut config: TimerConfig) -> Result<Timer, TimerError> {
        config.validate()?;
        config.id = id;
        self.edit(id, |timer| {
            timer.config = config;
            vec![Effect::RequestRequery]
        })
        .await
    }

    /// Arm or disarm a timer. Arming starts a fresh interval at `now_millis`.
    pub async fn set_enabled(&self, id: TimerId, enabled: bool, now_millis: i64) -> Result<Timer, TimerError> {
        self.edit(id, |timer| {
            timer.enabled = enabled;
            let mut effects = Vec::new();
            if enabled {
                effects.push(timer.reset(now_millis));
            } else {
                effects.push(Effect::CancelNotification(id));
                effects.push(Effect::RequestRequery);
            }
            effects.push(Effect::ScheduleAlarm(id, AlarmPlan::for_timer(timer)));
            effects
        })
        .await
    }

    /// Mark the last fire as seen.
    ///
    /// A repeating timer starts its next interval now; a one-shot timer is
    /// disarmed.
    pub async fn acknowledge(&self, id: TimerId, now_millis: i64) -> Result<Timer, TimerError> {
        self.edit(id, |timer| {
            timer.seen = true;
            let mut effects = vec![Effect::CancelNotification(id)];
            if timer.enabled {
                if timer.config.interval_secs > 0 {
                    effects.push(timer.reset(now_millis));
                } else {
                    timer.enabled = false;
                    effects.push(Effect::RequestRequery);
                }
                effects.push(Effect::ScheduleAlarm(id, AlarmPlan::for_timer(timer)));
            } else {
                effects.push(Effect::RequestRequery);
            }
            effects
        })
        .await
    }

    /// Make the next fire count as night regardless of the clock
    pub async fn set_night_next(&self, id: TimerId) -> Result<Timer, TimerError> {
        self.edit(id, |timer| {
            timer.night_next = true;
            Vec::new()
        })
        .await
    }

    pub async fn is_late_by_mins(&self, id: TimerId, now_millis: i64, mins: i64) -> Result<bool, TimerError> {
        Ok(self.get(id).await?.is_late_by_mins(now_millis, mins))
    }

    pub async fn is_night(&self, id: TimerId, now_millis: i64) -> Result<bool, TimerError> {
        Ok(self.zone.is_night(&self.get(id).await?, now_millis))
    }

    /// Run one scheduling decision for `id` at `now_millis`
    pub async fn tick(&self, id: TimerId, now_millis: i64) -> Result<TickReport, TimerError> {
        let mut current = self.lock(id).await?;

        let decision = self.zone.decide(&current, now_millis);
        let requery = self.execute(&decision.effects).inspect_err(|e| {
            error!(timer = id, "Tick effects failed: {}", e);
        })?;
        if decision.need_save {
            self.ports.store.persist(&decision.state).inspect_err(|e| {
                error!(timer = id, "Failed to persist timer: {}", e);
            })?;
        }
        *current = decision.state;
        if requery {
            self.ports.requery.request_requery();
        }

        let notification = match decision.outcome {
            NotifyOutcome::Notify(notification) => Some(notification),
            NotifyOutcome::Suppress => None,
        };
        debug!(
            timer = id,
            notified = notification.is_some(),
            need_save = decision.need_save,
            "Tick complete"
        );
        Ok(TickReport {
            id,
            notification,
            night: decision.night,
            need_save: decision.need_save,
            next_fire_millis: current.next_fire_millis,
        })
    }

    async fn slot(&self, id: TimerId) -> Result<Arc<Mutex<Timer>>, TimerError> {
        self.timers
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TimerError::NotFound(id))
    }

    /// Take the per-id lock of a timer that is still registered.
    ///
    /// A removal may finish while we wait for the lock; its slot is then
    /// detached from the map and must not be touched again.
    async fn lock(&self, id: TimerId) -> Result<OwnedMutexGuard<Timer>, TimerError> {
        let slot = self.slot(id).await?;
        let guard = Arc::clone(&slot).lock_owned().await;
        let live = self
            .timers
            .read()
            .await
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, &slot));
        if live {
            Ok(guard)
        } else {
            Err(TimerError::NotFound(id))
        }
    }

    async fn edit<F>(&self, id: TimerId, apply: F) -> Result<Timer, TimerError>
    where
        F: FnOnce(&mut Timer) -> Vec<Effect>,
    {
        let mut current = self.lock(id).await?;

        let mut next = current.clone();
        let effects = apply(&mut next);
        let requery = self.execute(&effects)?;
        self.ports.store.persist(&next)?;
        *current = next.clone();
        if requery {
            self.ports.requery.request_requery();
        }
        Ok(next)
    }

    /// Hand effects to collaborators in order. Requery requests are held
    /// back and reported so they go out after the state is committed.
    fn execute(&self, effects: &[Effect]) -> Result<bool, TimerError> {
        let mut requery = false;
        for effect in effects {
            match effect {
                Effect::CancelNotification(id) => self.ports.notifier.cancel(*id)?,
                Effect::ShowNotification(notification) => {
                    let guard = self.wake.acquire();
                    self.ports.notifier.show(notification)?;
                    guard.release_after(self.wake_hold);
                }
                Effect::ScheduleAlarm(id, plan) => self.ports.alarms.schedule(*id, plan)?,
                Effect::RequestRequery => requery = true,
            }
        }
        Ok(requery)
    }
}
