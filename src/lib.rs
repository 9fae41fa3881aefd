//! Nag Timer - recurring reminders that know when to keep quiet
//!
//! Each timer fires at a fixed interval. During a daily night window a fire
//! can use a different tone and indicator, or wait for acknowledgement
//! instead of starting the next interval. The scheduling core in
//! [`schedule`] is pure; [`state::Scheduler`] owns the timers and drives the
//! collaborators declared in [`ports`].

pub mod api;
pub mod config;
pub mod error;
pub mod ports;
pub mod schedule;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, Scheduler, Timer, TimerConfig};
pub use utils::signals::shutdown_signal;
