//! Read-only projections over a memo list.
//!
//! # Responsibility
//! - Filter memos by calendar day, bucket and month for list/calendar views.
//! - Build the completed-record history grouped by day.
//!
//! # Invariants
//! - Every function is pure: no mutation, no persistence.
//! - Returned memos keep list order unless stated otherwise.

use crate::calendar::DayCalendar;
use crate::model::memo::{Memo, MemoType};
use crate::model::year_month::YearMonth;
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Relative-day bucket used by to-do list sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayBucket {
    Past,
    Today,
    Tomorrow,
    Later,
}

/// Completed memos of one day in the record view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGroup<'a> {
    pub day: NaiveDate,
    pub memos: Vec<&'a Memo>,
}

pub fn bucket_of(calendar: &DayCalendar, today: NaiveDate, memo: &Memo) -> DayBucket {
    let day = calendar.day_of(memo.date);
    if day < today {
        return DayBucket::Past;
    }
    if day == today {
        return DayBucket::Today;
    }
    match today.checked_add_days(Days::new(1)) {
        Some(tomorrow) if day == tomorrow => DayBucket::Tomorrow,
        _ => DayBucket::Later,
    }
}

pub fn memos_on<'a>(memos: &'a [Memo], calendar: &DayCalendar, day: NaiveDate) -> Vec<&'a Memo> {
    memos
        .iter()
        .filter(|memo| calendar.day_of(memo.date) == day)
        .collect()
}

pub fn memos_from<'a>(memos: &'a [Memo], calendar: &DayCalendar, day: NaiveDate) -> Vec<&'a Memo> {
    memos
        .iter()
        .filter(|memo| calendar.day_of(memo.date) >= day)
        .collect()
}

pub fn memos_in_bucket<'a>(
    memos: &'a [Memo],
    calendar: &DayCalendar,
    today: NaiveDate,
    bucket: DayBucket,
) -> Vec<&'a Memo> {
    memos
        .iter()
        .filter(|memo| bucket_of(calendar, today, memo) == bucket)
        .collect()
}

/// Routine slots dated on `day`.
pub fn routines_on<'a>(
    memos: &'a [Memo],
    calendar: &DayCalendar,
    day: NaiveDate,
) -> Vec<&'a Memo> {
    memos
        .iter()
        .filter(|memo| memo.memo_type == MemoType::Routine && calendar.day_of(memo.date) == day)
        .collect()
}

pub fn has_event(memos: &[Memo], calendar: &DayCalendar, day: NaiveDate) -> bool {
    memos.iter().any(|memo| calendar.day_of(memo.date) == day)
}

/// Completed memos within `year_month`, grouped by day, newest day first.
pub fn record_groups<'a>(
    memos: &'a [Memo],
    calendar: &DayCalendar,
    year_month: YearMonth,
) -> Vec<RecordGroup<'a>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&'a Memo>> = BTreeMap::new();
    for memo in memos.iter().filter(|memo| memo.is_completed) {
        let day = calendar.day_of(memo.date);
        if year_month.contains(day) {
            grouped.entry(day).or_default().push(memo);
        }
    }

    grouped
        .into_iter()
        .rev()
        .map(|(day, memos)| RecordGroup { day, memos })
        .collect()
}

/// Distinct months holding any memo, newest first, never after `current`.
pub fn available_year_months(
    memos: &[Memo],
    calendar: &DayCalendar,
    current: YearMonth,
) -> Vec<YearMonth> {
    let months: BTreeSet<YearMonth> = memos
        .iter()
        .map(|memo| YearMonth::of(calendar.day_of(memo.date)))
        .filter(|month| *month <= current)
        .collect();
    months.into_iter().rev().collect()
}
