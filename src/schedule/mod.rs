//! Scheduling core
//!
//! Pure decision logic: where night windows fall, whether a pending fire is a
//! night fire, what a tick does to a timer and which alarm the trigger
//! facility should hold. Nothing in here performs I/O; effects are returned
//! for the caller to execute.

pub mod clock_window;
pub mod decision;
pub mod night;
pub mod plan;
pub mod zone;

pub use clock_window::occurrence;
pub use decision::{decide, Decision, Effect, Notification, NotifyOutcome};
pub use night::{is_night, NightWindow, FORCE_WAKE_TIME};
pub use plan::{AlarmPlan, REPEAT_PERIOD_MILLIS};
pub use zone::Zone;
