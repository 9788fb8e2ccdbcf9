//! Calendar-day arithmetic over epoch-millisecond timestamps.
//!
//! # Responsibility
//! - Map timestamps to local calendar days for a fixed UTC offset.
//! - Provide day boundaries used by rollover and widget refresh.
//!
//! # Invariants
//! - Two timestamps are "the same day" iff `day_of` returns the same date.
//! - `start_of_day(day_of(t)) <= t` for every representable `t`.
//! - `day_of` is total: timestamps beyond chrono's range map to
//!   `NaiveDate::MIN` / `NaiveDate::MAX` for any offset.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Local calendar used to bucket memos by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    offset: FixedOffset,
}

impl DayCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(FixedOffset::east_opt(0).expect("zero offset is valid"))
    }

    /// Builds a calendar from minutes east of UTC.
    ///
    /// Returns `None` outside the ±18h range accepted by `FixedOffset`.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return None;
        }
        FixedOffset::east_opt(minutes * 60).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local calendar day containing `epoch_ms`.
    pub fn day_of(&self, epoch_ms: i64) -> NaiveDate {
        let clamped = if epoch_ms < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        };
        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(epoch_ms) else {
            return clamped;
        };
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        utc.naive_utc()
            .checked_add_signed(shift)
            .map_or(clamped, |local| local.date())
    }

    /// Epoch milliseconds of local midnight opening `day`.
    pub fn start_of_day(&self, day: NaiveDate) -> i64 {
        let local_midnight = day.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        local_midnight - i64::from(self.offset.local_minus_utc()) * 1000
    }

    pub fn is_same_day(&self, left_ms: i64, right_ms: i64) -> bool {
        self.day_of(left_ms) == self.day_of(right_ms)
    }

    /// Shifts a timestamp by whole days, keeping the local time of day.
    pub fn add_days(&self, epoch_ms: i64, days: i64) -> i64 {
        epoch_ms.saturating_add(days.saturating_mul(MILLIS_PER_DAY))
    }

    /// Local midnight after `epoch_ms`.
    pub fn next_midnight(&self, epoch_ms: i64) -> i64 {
        let day = self.day_of(epoch_ms);
        match day.checked_add_days(Days::new(1)) {
            Some(next) => self.start_of_day(next),
            None => epoch_ms,
        }
    }
}
