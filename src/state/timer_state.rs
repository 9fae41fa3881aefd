//! Timer configuration and per-timer scheduling state

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    schedule::{clock_window::SECONDS_PER_DAY, Effect},
};

/// Stable timer identity
pub type TimerId = u64;

/// Sound reference used for new timers when nothing else is configured
pub const DEFAULT_ALARM_TONE: &str = "default:alarm";

/// Label shown for timers without a name
pub const DEFAULT_DISPLAY_NAME: &str = "Timer";

/// Added to every computed fire time so it never ties with a window edge
pub const RESET_EPSILON_MILLIS: i64 = 3;

/// User-editable part of a timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub id: TimerId,
    pub name: String,
    /// Seconds between fires; 0 makes the timer one-shot
    pub interval_secs: u32,
    /// Seconds after local midnight
    pub night_start: u32,
    /// Seconds after local midnight; may be earlier than `night_start`
    pub night_stop: u32,
    pub day_tone: Option<String>,
    pub night_tone: Option<String>,
    pub day_led: bool,
    pub night_led: bool,
    pub day_wait: bool,
    pub night_wait: bool,
}

impl TimerConfig {
    /// Name to show in notifications
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            &self.name
        }
    }

    /// Reject time-of-day values outside a single day
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("night_start", self.night_start), ("night_stop", self.night_stop)] {
            if value >= SECONDS_PER_DAY {
                return Err(ConfigError::TimeOfDayOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            interval_secs: 4 * 60 * 60,
            night_start: 0,
            night_stop: 8 * 60 * 60,
            day_tone: Some(DEFAULT_ALARM_TONE.to_string()),
            night_tone: None,
            day_led: true,
            night_led: false,
            day_wait: true,
            night_wait: true,
        }
    }
}

/// Where a timer sits in its fire cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Disabled
    Idle,
    /// Enabled and waiting for its fire time
    Armed,
    /// Fire time passed without an automatic reschedule
    AwaitingAck,
}

/// A timer together with the fields the scheduler mutates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    #[serde(flatten)]
    pub config: TimerConfig,
    pub enabled: bool,
    /// Epoch milliseconds of the next fire, 0 if never armed
    pub next_fire_millis: i64,
    /// Treat the next fire as night whatever the clock says
    pub night_next: bool,
    /// The user has acknowledged the last fire
    pub seen: bool,
}

impl Timer {
    /// Create a disabled timer with default settings
    pub fn new(id: TimerId) -> Self {
        Self::from_config(TimerConfig {
            id,
            ..TimerConfig::default()
        })
    }

    /// Create a disabled, never armed timer from an existing configuration
    pub fn from_config(config: TimerConfig) -> Self {
        Self {
            config,
            enabled: false,
            next_fire_millis: 0,
            night_next: false,
            seen: false,
        }
    }

    pub fn id(&self) -> TimerId {
        self.config.id
    }

    /// Recompute the next fire time from `now_millis`.
    ///
    /// Returns the requery request that the caller has to forward to
    /// whoever watches this timer's conditions.
    #[must_use = "the requery request must be forwarded"]
    pub fn reset(&mut self, now_millis: i64) -> Effect {
        let base = if self.enabled { now_millis } else { 0 };
        self.next_fire_millis =
            base + i64::from(self.config.interval_secs) * 1000 + RESET_EPSILON_MILLIS;
        Effect::RequestRequery
    }

    /// Whether the timer is at least `mins` whole minutes past its fire time
    pub fn is_late_by_mins(&self, now_millis: i64, mins: i64) -> bool {
        if !self.enabled {
            return false;
        }
        let late = now_millis - self.next_fire_millis;
        // late >= 0 keeps mins == 0 false until the fire time itself
        late >= 0 && late / 60_000 >= mins
    }

    pub fn phase(&self, now_millis: i64) -> Phase {
        if !self.enabled {
            Phase::Idle
        } else if now_millis < self.next_fire_millis {
            Phase::Armed
        } else {
            Phase::AwaitingAck
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_timer(interval_secs: u32) -> Timer {
        let mut timer = Timer::new(1);
        timer.config.interval_secs = interval_secs;
        timer.enabled = true;
        timer
    }

    #[test]
    fn new_timer_defaults() {
        let timer = Timer::new(7);
        assert_eq!(timer.id(), 7);
        assert!(!timer.enabled);
        assert_eq!(timer.next_fire_millis, 0);
        assert_eq!(timer.config.interval_secs, 14_400);
        assert_eq!(timer.config.night_start, 0);
        assert_eq!(timer.config.night_stop, 28_800);
        assert_eq!(timer.config.day_tone.as_deref(), Some(DEFAULT_ALARM_TONE));
        assert_eq!(timer.config.night_tone, None);
        assert!(timer.config.day_led && timer.config.day_wait);
        assert!(!timer.config.night_led && timer.config.night_wait);
        assert_eq!(timer.phase(0), Phase::Idle);
    }

    #[test]
    fn empty_name_displays_default() {
        let mut timer = Timer::new(1);
        assert_eq!(timer.config.display_name(), "Timer");
        timer.config.name = "Meds".to_string();
        assert_eq!(timer.config.display_name(), "Meds");
    }

    #[test]
    fn validate_rejects_out_of_range_time_of_day() {
        let mut config = TimerConfig::default();
        assert!(config.validate().is_ok());
        config.night_stop = SECONDS_PER_DAY - 1;
        assert!(config.validate().is_ok());
        config.night_start = SECONDS_PER_DAY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TimeOfDayOutOfRange { field: "night_start", value: 86_400 })
        ));
    }

    #[test]
    fn reset_when_enabled_counts_from_now() {
        let mut timer = enabled_timer(600);
        let effect = timer.reset(1_000_000);
        assert_eq!(effect, Effect::RequestRequery);
        assert_eq!(timer.next_fire_millis, 1_000_000 + 600_000 + 3);
    }

    #[test]
    fn reset_when_disabled_counts_from_zero() {
        let mut timer = Timer::new(1);
        let _ = timer.reset(1_000_000);
        assert_eq!(timer.next_fire_millis, 14_400_000 + 3);
    }

    #[test]
    fn repeated_reset_advances_by_interval() {
        let mut timer = enabled_timer(3600);
        let _ = timer.reset(0);
        let first = timer.next_fire_millis;
        let _ = timer.reset(first);
        let second = timer.next_fire_millis;
        assert_eq!(second - first, 3_600_000 + 3);
        let _ = timer.reset(second);
        assert_eq!(timer.next_fire_millis - second, 3_600_000 + 3);
    }

    #[test]
    fn lateness_boundaries() {
        let mut timer = enabled_timer(60);
        timer.next_fire_millis = 10_000_000;
        let next = timer.next_fire_millis;
        assert!(!timer.is_late_by_mins(next - 1, 0));
        assert!(timer.is_late_by_mins(next, 0));
        assert!(!timer.is_late_by_mins(next + 59_999, 1));
        assert!(timer.is_late_by_mins(next + 60_000, 1));
        assert!(timer.is_late_by_mins(next + 600_000, 10));
    }

    #[test]
    fn disabled_timer_is_never_late() {
        let mut timer = Timer::new(1);
        timer.next_fire_millis = 5;
        assert!(!timer.is_late_by_mins(i64::MAX / 2, 0));
    }

    #[test]
    fn phase_follows_fire_time() {
        let mut timer = enabled_timer(60);
        timer.next_fire_millis = 1000;
        assert_eq!(timer.phase(999), Phase::Armed);
        assert_eq!(timer.phase(1000), Phase::AwaitingAck);
        timer.enabled = false;
        assert_eq!(timer.phase(1000), Phase::Idle);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: TimerConfig = serde_json::from_str(r#"{"name":"Water","interval_secs":900}"#).unwrap();
        assert_eq!(config.name, "Water");
        assert_eq!(config.interval_secs, 900);
        assert_eq!(config.night_stop, 28_800);
        assert!(config.day_wait);
    }
}
