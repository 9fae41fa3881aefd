//! Local clock used to place night windows

use chrono::{FixedOffset, Local};

use super::{decision::decide, night::is_night, Decision};
use crate::state::Timer;

/// Time zone whose calendar days the night window follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The host's local zone, DST included
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    /// Build a fixed zone from an offset east of UTC, `None` if out of range
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::Fixed)
    }

    pub fn decide(&self, timer: &Timer, now_millis: i64) -> Decision {
        match self {
            Self::Local => decide(timer, now_millis, &Local),
            Self::Fixed(offset) => decide(timer, now_millis, offset),
        }
    }

    pub fn is_night(&self, timer: &Timer, now_millis: i64) -> bool {
        match self {
            Self::Local => is_night(timer, now_millis, &Local),
            Self::Fixed(offset) => is_night(timer, now_millis, offset),
        }
    }
}
