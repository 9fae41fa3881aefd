//! Per-tick notify/suppress decision

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{night::is_night, plan::AlarmPlan};
use crate::state::{Timer, TimerId};

/// A notification the collaborator should put on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: TimerId,
    pub text: String,
    /// Sound to play, `None` for silent
    pub tone: Option<String>,
    pub use_led: bool,
    /// Fire time the notification refers to
    pub when_millis: i64,
}

/// Side effects requested by the scheduler, executed in order by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CancelNotification(TimerId),
    /// Must be handed off while a wake assertion is held
    ShowNotification(Notification),
    ScheduleAlarm(TimerId, AlarmPlan),
    RequestRequery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Suppress,
    Notify(Notification),
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Timer state after the tick
    pub state: Timer,
    pub outcome: NotifyOutcome,
    /// Whether `state` differs from what is persisted
    pub need_save: bool,
    /// Night classification used for the fire; false when suppressed
    pub night: bool,
    pub effects: Vec<Effect>,
}

/// Decide what a tick at `now_millis` does to `timer`.
///
/// Pure: the same `(timer, now_millis)` always yields the same decision, so a
/// tick whose effects failed can simply be repeated.
pub fn decide<Tz: TimeZone>(timer: &Timer, now_millis: i64, tz: &Tz) -> Decision {
    let id = timer.id();

    if !timer.enabled {
        debug!(timer = id, "timer disabled, suppressing");
        return Decision {
            state: timer.clone(),
            outcome: NotifyOutcome::Suppress,
            need_save: false,
            night: false,
            effects: vec![
                Effect::CancelNotification(id),
                Effect::ScheduleAlarm(id, AlarmPlan::Cancel),
                Effect::RequestRequery,
            ],
        };
    }

    let mut state = timer.clone();
    let night = is_night(&state, now_millis, tz);
    // the one-shot flag is consumed here and must be written back
    let mut need_save = state.night_next;
    state.night_next = false;

    let (config, next_fire) = (&state.config, state.next_fire_millis);
    let notification = Notification {
        id,
        text: config.display_name().to_string(),
        tone: if night { config.night_tone.clone() } else { config.day_tone.clone() },
        use_led: if night { config.night_led } else { config.day_led },
        when_millis: next_fire,
    };
    let wait = if night { config.night_wait } else { config.day_wait };
    debug!(timer = id, night, wait, next_fire, "firing");

    let mut effects = vec![Effect::ShowNotification(notification.clone())];

    if !wait && state.config.interval_secs > 0 {
        effects.push(state.reset(now_millis));
        need_save = true;
        effects.push(Effect::ScheduleAlarm(id, AlarmPlan::for_timer(&state)));
        state.seen = false;
        debug!(timer = id, next_fire = state.next_fire_millis, "rescheduled");
    }

    Decision {
        state,
        outcome: NotifyOutcome::Notify(notification),
        need_save,
        night,
        effects,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const HOUR: u32 = 3600;

    fn at(h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 9, 10, h, m, 0).unwrap().timestamp_millis()
    }

    fn armed(next_fire: i64) -> Timer {
        let mut timer = Timer::new(9);
        timer.enabled = true;
        timer.config.name = "Stretch".to_string();
        timer.config.interval_secs = 4 * HOUR;
        timer.config.day_wait = false;
        timer.config.night_tone = Some("chime".to_string());
        timer.next_fire_millis = next_fire;
        timer.seen = true;
        timer
    }

    fn notification(decision: &Decision) -> &Notification {
        match &decision.outcome {
            NotifyOutcome::Notify(n) => n,
            NotifyOutcome::Suppress => panic!("expected a notification"),
        }
    }

    #[test]
    fn day_fire_notifies_and_reschedules() {
        let d = at(14, 0);
        let decision = decide(&armed(d), d, &Utc);

        assert!(!decision.night);
        assert!(decision.need_save);
        let n = notification(&decision);
        assert_eq!(n.text, "Stretch");
        assert_eq!(n.tone.as_deref(), Some("default:alarm"));
        assert!(n.use_led);
        assert_eq!(n.when_millis, d);

        assert_eq!(decision.state.next_fire_millis, d + 14_400_000 + 3);
        assert!(!decision.state.seen);
        assert_eq!(
            decision.effects,
            vec![
                Effect::ShowNotification(n.clone()),
                Effect::RequestRequery,
                Effect::ScheduleAlarm(
                    9,
                    AlarmPlan::RepeatAt {
                        first_millis: d + 14_400_000 + 3,
                        period_millis: 300_000
                    }
                ),
            ]
        );
    }

    #[test]
    fn night_fire_with_wait_keeps_schedule() {
        let n3 = at(3, 0);
        let timer = armed(n3);
        let decision = decide(&timer, n3, &Utc);

        assert!(decision.night);
        assert!(!decision.need_save);
        let n = notification(&decision);
        assert_eq!(n.tone.as_deref(), Some("chime"));
        assert!(!n.use_led);
        assert_eq!(decision.state, timer);
        assert_eq!(decision.effects, vec![Effect::ShowNotification(n.clone())]);
    }

    #[test]
    fn night_next_is_consumed_once() {
        let d = at(14, 0);
        let mut timer = armed(d);
        timer.config.night_wait = true;
        timer.night_next = true;

        let first = decide(&timer, d, &Utc);
        assert!(first.night);
        assert!(first.need_save);
        assert!(!first.state.night_next);
        assert_eq!(first.state.next_fire_millis, d);

        let second = decide(&first.state, d, &Utc);
        assert!(!second.night);
        assert!(second.state.next_fire_millis > d);
    }

    #[test]
    fn disabled_timer_is_suppressed() {
        let mut timer = armed(at(14, 0));
        timer.enabled = false;
        let decision = decide(&timer, at(14, 0), &Utc);

        assert_eq!(decision.outcome, NotifyOutcome::Suppress);
        assert!(!decision.need_save);
        assert_eq!(decision.state, timer);
        assert_eq!(
            decision.effects,
            vec![
                Effect::CancelNotification(9),
                Effect::ScheduleAlarm(9, AlarmPlan::Cancel),
                Effect::RequestRequery,
            ]
        );
    }

    #[test]
    fn disabled_wins_over_night_next() {
        let mut timer = armed(at(14, 0));
        timer.enabled = false;
        timer.night_next = true;
        let decision = decide(&timer, at(14, 0), &Utc);
        assert_eq!(decision.outcome, NotifyOutcome::Suppress);
        assert!(decision.state.night_next);
    }

    #[test]
    fn one_shot_timer_never_resets() {
        let d = at(14, 0);
        let mut timer = armed(d);
        timer.config.interval_secs = 0;
        let decision = decide(&timer, d, &Utc);
        assert!(!decision.need_save);
        assert_eq!(decision.state.next_fire_millis, d);
        assert!(decision.state.seen);
    }

    #[test]
    fn unnamed_timer_uses_default_text() {
        let d = at(14, 0);
        let mut timer = armed(d);
        timer.config.name.clear();
        assert_eq!(notification(&decide(&timer, d, &Utc)).text, "Timer");
    }

    #[test]
    fn repeated_decision_is_identical() {
        let d = at(14, 0);
        let mut timer = armed(d);
        timer.night_next = true;
        assert_eq!(decide(&timer, d + 5, &Utc), decide(&timer, d + 5, &Utc));
    }

    #[test]
    fn late_tick_reschedules_from_now() {
        let d = at(14, 0);
        let now = d + 300_000;
        let decision = decide(&armed(d), now, &Utc);
        assert_eq!(decision.state.next_fire_millis, now + 14_400_000 + 3);
        assert_eq!(notification(&decision).when_millis, d);
    }
}
