//! Occurrences of a daily time-of-day around a reference instant

use chrono::{DateTime, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone};

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Find the instant, in epoch milliseconds, at which the local clock of `tz`
/// next (or last, when `forwards` is false) reads `time_of_day` seconds past
/// midnight, as seen from `from_millis`.
///
/// The search starts on the local calendar day of `from_millis` and moves one
/// day when that candidate lies on the wrong side of it, so a result equal to
/// `from_millis` is accepted in both directions.
///
/// Local times skipped by a DST jump are placed using the UTC offset in force
/// at `from_millis`; repeated local times resolve to the earlier instant.
pub fn occurrence<Tz: TimeZone>(tz: &Tz, time_of_day: u32, from_millis: i64, forwards: bool) -> i64 {
    let Some(from) = DateTime::from_timestamp_millis(from_millis) else {
        return from_millis;
    };
    let local = from.with_timezone(tz);
    let fallback_offset = local.offset().fix().local_minus_utc();
    let time = NaiveTime::from_num_seconds_from_midnight_opt(time_of_day % SECONDS_PER_DAY, 0)
        .unwrap_or(NaiveTime::MIN);

    let day = local.date_naive();
    let candidate = resolve(tz, day.and_time(time), fallback_offset);

    let other_day = if forwards && candidate < from_millis {
        day.succ_opt()
    } else if !forwards && candidate > from_millis {
        day.pred_opt()
    } else {
        return candidate;
    };

    other_day.map_or(candidate, |day| resolve(tz, day.and_time(time), fallback_offset))
}

fn resolve<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, fallback_offset: i32) -> i64 {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(at) => at.timestamp_millis(),
        LocalResult::Ambiguous(a, b) => a.timestamp_millis().min(b.timestamp_millis()),
        LocalResult::None => {
            naive.and_utc().timestamp_millis() - i64::from(fallback_offset) * 1000
        }
    }
}
