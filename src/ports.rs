//! Collaborator interfaces
//!
//! The scheduler decides; implementations of these traits carry the
//! decisions out. Each is shared across tasks, hence `Send + Sync`.

use crate::{
    error::{StoreError, TimerError},
    schedule::{AlarmPlan, Notification},
    state::{Timer, TimerId},
};

/// Time-based trigger facility
pub trait AlarmScheduler: Send + Sync {
    /// Install `plan` for `id`, replacing any previous plan.
    /// [`AlarmPlan::Cancel`] removes it.
    fn schedule(&self, id: TimerId, plan: &AlarmPlan) -> Result<(), TimerError>;
}

/// Notification facility. Showing twice for one id replaces the first.
pub trait Notifier: Send + Sync {
    fn show(&self, notification: &Notification) -> Result<(), TimerError>;
    fn cancel(&self, id: TimerId) -> Result<(), TimerError>;
}

/// Tells external consumers that timer conditions changed
pub trait RequeryPort: Send + Sync {
    fn request_requery(&self);
}

/// Durable storage of timer records
pub trait TimerStore: Send + Sync {
    fn persist(&self, timer: &Timer) -> Result<(), StoreError>;
    fn remove(&self, id: TimerId) -> Result<(), StoreError>;
    fn load_all(&self) -> Result<Vec<Timer>, StoreError>;
}
