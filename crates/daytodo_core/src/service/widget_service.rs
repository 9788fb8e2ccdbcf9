//! Widget-side loader for the home-screen snapshot.
//!
//! # Responsibility
//! - Load the shared memo blob through a read-only source.
//! - Select the memos the widget renders and when to refresh next.
//!
//! # Invariants
//! - The widget never writes: it only holds a `MemoSource`.
//! - Load failures degrade to an empty snapshot.

use crate::calendar::DayCalendar;
use crate::clock::Clock;
use crate::config::{ConfigError, StoreConfig};
use crate::model::memo::Memo;
use crate::repo::memo_repo::MemoSource;
use chrono::NaiveDate;
use log::{info, warn};

/// One rendered widget row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEntry {
    pub memo: Memo,
    /// Rows for later days are rendered dimmed.
    pub is_today: bool,
}

/// Timeline entry handed to the widget renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSnapshot {
    /// Day this snapshot was generated for.
    pub day: NaiveDate,
    pub entries: Vec<WidgetEntry>,
    /// Epoch milliseconds of the next local midnight.
    pub next_refresh_ms: i64,
}

pub struct WidgetService<S: MemoSource, C: Clock> {
    source: S,
    clock: C,
    calendar: DayCalendar,
    limit: usize,
}

impl<S: MemoSource, C: Clock> WidgetService<S, C> {
    pub fn new(source: S, clock: C, config: &StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            clock,
            calendar: config.calendar()?,
            limit: config.widget_limit,
        })
    }

    /// Builds the snapshot for the current day.
    ///
    /// Keeps memos dated on or after the start of today, in stored order,
    /// up to the configured limit.
    pub fn snapshot(&self) -> WidgetSnapshot {
        let now = self.clock.now_ms();
        let today = self.calendar.day_of(now);
        let today_start = self.calendar.start_of_day(today);

        let memos = match self.source.load_memos() {
            Ok(memos) => memos,
            Err(err) => {
                warn!(
                    "event=widget_load module=widget status=degraded error_code={}",
                    err.code()
                );
                Vec::new()
            }
        };

        let entries: Vec<WidgetEntry> = memos
            .into_iter()
            .filter(|memo| memo.date >= today_start)
            .take(self.limit)
            .map(|memo| WidgetEntry {
                is_today: self.calendar.day_of(memo.date) == today,
                memo,
            })
            .collect();

        info!(
            "event=widget_snapshot module=widget status=ok entries={}",
            entries.len()
        );
        WidgetSnapshot {
            day: today,
            entries,
            next_refresh_ms: self.calendar.next_midnight(now),
        }
    }
}
