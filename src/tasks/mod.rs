//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alarm_task;
pub mod requery_log;

// Re-export main functions
pub use alarm_task::alarm_task;
pub use requery_log::requery_log_task;
