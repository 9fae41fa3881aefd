//! Alarm instructions for the external trigger facility

use serde::{Deserialize, Serialize};

use crate::state::Timer;

/// Re-check period for an armed timer. Fires are re-evaluated on every
/// period, so a fire is at most one period late.
pub const REPEAT_PERIOD_MILLIS: i64 = 300_000;

/// What the alarm facility should do for one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlarmPlan {
    /// Trigger at `first_millis`, then every `period_millis`
    RepeatAt { first_millis: i64, period_millis: i64 },
    Cancel,
}

impl AlarmPlan {
    pub fn for_timer(timer: &Timer) -> Self {
        if timer.enabled {
            Self::RepeatAt {
                first_millis: timer.next_fire_millis,
                period_millis: REPEAT_PERIOD_MILLIS,
            }
        } else {
            Self::Cancel
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_timer_repeats_from_next_fire() {
        let mut timer = Timer::new(3);
        timer.enabled = true;
        timer.next_fire_millis = 42_000;
        assert_eq!(
            AlarmPlan::for_timer(&timer),
            AlarmPlan::RepeatAt {
                first_millis: 42_000,
                period_millis: 300_000
            }
        );
    }

    #[test]
    fn disabled_timer_cancels() {
        let mut timer = Timer::new(3);
        timer.next_fire_millis = 42_000;
        assert_eq!(AlarmPlan::for_timer(&timer), AlarmPlan::Cancel);
    }
}
