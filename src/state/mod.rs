//! State management module
//!
//! Timer records, the scheduler that owns them, and the application state
//! that ties the scheduler to its collaborators.

pub mod app_state;
pub mod scheduler;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use scheduler::{Collaborators, Scheduler, TickReport};
pub use timer_state::{Phase, Timer, TimerConfig, TimerId, DEFAULT_ALARM_TONE};
