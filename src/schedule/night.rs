//! Night-window classification of fire instants

use chrono::TimeZone;

use super::clock_window::occurrence;
use crate::state::{Timer, TimerConfig};

/// Local time of day (11:30:00) after which a finished night no longer
/// silences anything
pub const FORCE_WAKE_TIME: u32 = (11 * 60 + 30) * 60;

/// The night window as seen from one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    pub last_night_start: i64,
    pub next_night_stop: i64,
    pub last_force_wake: i64,
}

impl NightWindow {
    /// Locate the most recent night start, the stop that follows it and the
    /// most recent force-wake, all relative to `now_millis`
    pub fn around<Tz: TimeZone>(config: &TimerConfig, now_millis: i64, tz: &Tz) -> Self {
        let last_night_start = occurrence(tz, config.night_start, now_millis, false);
        Self {
            last_night_start,
            next_night_stop: occurrence(tz, config.night_stop, last_night_start, true),
            last_force_wake: occurrence(tz, FORCE_WAKE_TIME, now_millis, false),
        }
    }

    /// Whether a fire at `instant` belongs to this night
    pub fn contains(&self, instant: i64) -> bool {
        self.last_night_start <= instant
            && !(self.next_night_stop <= instant || self.last_force_wake >= self.next_night_stop)
    }
}

/// Whether the timer's pending fire counts as a night fire at `now_millis`.
///
/// Does not consume `night_next`; the decision step clears it.
pub fn is_night<Tz: TimeZone>(timer: &Timer, now_millis: i64, tz: &Tz) -> bool {
    if timer.night_next {
        return true;
    }
    if timer.config.night_start == timer.config.night_stop {
        return false;
    }
    NightWindow::around(&timer.config, now_millis, tz).contains(timer.next_fire_millis)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    const HOUR: u32 = 3600;

    fn day(h: u32, m: u32) -> i64 {
        hm(15, h, m)
    }

    fn hm(d: u32, h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 5, d, h, m, 0).unwrap().timestamp_millis()
    }

    fn timer(start: u32, stop: u32, next_fire: i64) -> Timer {
        let mut timer = Timer::new(1);
        timer.enabled = true;
        timer.config.night_start = start;
        timer.config.night_stop = stop;
        timer.next_fire_millis = next_fire;
        timer
    }

    #[test]
    fn fire_inside_plain_window_is_night() {
        let t = timer(0, 8 * HOUR, day(3, 0));
        assert!(is_night(&t, day(3, 0), &Utc));
    }

    #[test]
    fn fire_after_window_is_day() {
        let t = timer(0, 8 * HOUR, day(9, 0));
        assert!(!is_night(&t, day(10, 0), &Utc));
    }

    #[test]
    fn window_edges() {
        // start is inclusive
        let t = timer(0, 8 * HOUR, day(0, 0));
        assert!(is_night(&t, day(0, 0), &Utc));
        // stop is exclusive
        let t = timer(0, 8 * HOUR, day(8, 0));
        assert!(!is_night(&t, day(8, 0), &Utc));
        let t = timer(0, 8 * HOUR, day(8, 0) - 1);
        assert!(is_night(&t, day(8, 0) - 1, &Utc));
    }

    #[test]
    fn window_wrapping_midnight() {
        let start = 22 * HOUR;
        let stop = 6 * HOUR;
        assert!(is_night(&timer(start, stop, day(23, 0)), day(23, 0), &Utc));
        assert!(is_night(&timer(start, stop, day(2, 0)), day(2, 0), &Utc));
        assert!(!is_night(&timer(start, stop, day(6, 0)), day(6, 0), &Utc));
        assert!(!is_night(&timer(start, stop, day(21, 59)), day(21, 59), &Utc));
    }

    #[test]
    fn zero_width_window_is_never_night() {
        for start in [0, 1, 8 * HOUR, FORCE_WAKE_TIME, 86_399] {
            for (h, m) in [(0, 0), (3, 0), (8, 0), (11, 30), (12, 0), (23, 59)] {
                let now = day(h, m);
                for fire in [now - 3_600_000, now, now + 3_600_000] {
                    assert!(!is_night(&timer(start, start, fire), now, &Utc));
                }
            }
        }
    }

    #[test]
    fn zero_width_window_formula_is_empty() {
        let config = TimerConfig {
            night_start: 5 * HOUR,
            night_stop: 5 * HOUR,
            ..TimerConfig::default()
        };
        let window = NightWindow::around(&config, day(9, 0), &Utc);
        assert_eq!(window.last_night_start, window.next_night_stop);
        assert!(!window.contains(day(5, 0)));
        assert!(!window.contains(day(9, 0)));
    }

    #[test]
    fn night_next_forces_night() {
        let mut t = timer(0, 8 * HOUR, day(14, 0));
        assert!(!is_night(&t, day(14, 0), &Utc));
        t.night_next = true;
        assert!(is_night(&t, day(14, 0), &Utc));
        t.config.night_stop = t.config.night_start;
        assert!(is_night(&t, day(14, 0), &Utc));
        // classification never clears the flag
        assert!(t.night_next);
    }

    #[test]
    fn force_wake_reclassifies_overdue_night_fire() {
        // night 06:00-10:00, fire at 09:00 was left waiting
        let t = timer(6 * HOUR, 10 * HOUR, day(9, 0));
        assert!(is_night(&t, day(9, 30), &Utc));
        assert!(is_night(&t, day(11, 29), &Utc));
        assert!(!is_night(&t, day(11, 30), &Utc));
        assert!(!is_night(&t, day(15, 0), &Utc));
    }

    #[test]
    fn force_wake_at_exact_night_stop_counts_as_day() {
        let t = timer(6 * HOUR, FORCE_WAKE_TIME, day(9, 0));
        assert!(is_night(&t, day(11, 29), &Utc));
        let window = NightWindow::around(&t.config, day(11, 30), &Utc);
        assert_eq!(window.last_force_wake, window.next_night_stop);
        assert!(!is_night(&t, day(11, 30), &Utc));
    }

    #[test]
    fn window_ending_after_force_wake_stays_night() {
        // night 22:00-14:00 spans the force-wake time
        let t = timer(22 * HOUR, 14 * HOUR, day(12, 0));
        assert!(is_night(&t, day(12, 0), &Utc));
        let window = NightWindow::around(&t.config, day(12, 0), &Utc);
        assert_eq!(window.last_night_start, hm(14, 22, 0));
        assert_eq!(window.next_night_stop, day(14, 0));
    }

    #[test]
    fn fire_before_last_night_start_is_day() {
        // fired yesterday evening, still pending after midnight
        let t = timer(0, 8 * HOUR, hm(14, 23, 0));
        assert!(!is_night(&t, day(3, 0), &Utc));
    }

    #[test]
    fn window_follows_local_clock() {
        let zone = FixedOffset::east_opt(2 * HOUR as i32).unwrap();
        // 23:00 UTC is 01:00 local, inside a 00:00-08:00 local night
        let fire = hm(14, 23, 0);
        let t = timer(0, 8 * HOUR, fire);
        assert!(is_night(&t, fire, &zone));
        assert!(!is_night(&t, fire, &Utc));
    }
}
