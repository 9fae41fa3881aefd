//! Collaborator implementations
//!
//! In-process stand-ins for the platform facilities the scheduler drives:
//! alarms, notifications, requery broadcasts, wake assertions and storage.

pub mod alarm;
pub mod notifier;
pub mod requery;
pub mod store;
pub mod wake;

// Re-export main types
pub use alarm::AlarmRegistry;
pub use notifier::LogNotifier;
pub use requery::{RequeryChannel, RequeryEvent};
pub use store::JsonFileStore;
pub use wake::{WakeGuard, WakeLock, DEFAULT_WAKE_HOLD};
