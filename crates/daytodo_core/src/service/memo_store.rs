//! Memo store: the single owner of the in-memory memo list.
//!
//! # Responsibility
//! - Expose every memo mutation (save/delete/toggle/move/change date).
//! - Run the daily rollover pass that advances stale memos.
//! - Persist the full list after each mutation and raise a change flag.
//!
//! # Invariants
//! - Memos are ordered by ascending calendar day; order within a day is the
//!   user's manual order and survives re-sorting (stable sort).
//! - A content edit never changes `date`; only `change_date` and rollover do.
//! - Unknown ids are silent no-ops that report `false`.
//! - A mutation whose write fails leaves the list as it was before the call,
//!   with the change flag and refresh hook untouched.
//! - Rollover runs past-todo sweep, then completed-routine reset, then
//!   missed-routine reset, in exactly that order.
//!
//! # See also
//! - `service::memo_views` for the read-only projections.

use crate::calendar::DayCalendar;
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, StoreConfig};
use crate::model::memo::{Memo, MemoDraft, MemoId, MemoType};
use crate::model::year_month::YearMonth;
use crate::repo::memo_repo::{MemoRepository, RepoResult};
use crate::service::memo_views::{self, DayBucket, RecordGroup};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Callback fired after shared state changed, e.g. to reload the widget.
pub type RefreshHook = Box<dyn FnMut()>;

/// Per-step counts of one rollover pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverReport {
    /// Incomplete todos moved forward to today.
    pub past_todos_moved: usize,
    /// Completed routines reset for today (one history todo each).
    pub routines_completed: usize,
    /// Missed routines moved forward to today.
    pub routines_missed: usize,
}

impl RolloverReport {
    pub fn is_empty(&self) -> bool {
        self.past_todos_moved == 0 && self.routines_completed == 0 && self.routines_missed == 0
    }
}

pub struct MemoStore<R: MemoRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    calendar: DayCalendar,
    memos: Vec<Memo>,
    changed: bool,
    refresh_hook: Option<RefreshHook>,
}

impl<R: MemoRepository, C: Clock> MemoStore<R, C> {
    /// Creates an empty store. Call `load` to read persisted state.
    pub fn new(repo: R, clock: C, calendar: DayCalendar) -> Self {
        Self {
            repo,
            clock,
            calendar,
            memos: Vec::new(),
            changed: false,
            refresh_hook: None,
        }
    }

    /// Creates a store from configuration and loads persisted state.
    ///
    /// # Errors
    /// - Returns `ConfigError` for invalid configuration. Storage problems
    ///   never fail construction; they degrade to an empty list.
    pub fn open(repo: R, clock: C, config: &StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut store = Self::new(repo, clock, config.calendar()?);
        store.load();
        Ok(store)
    }

    pub fn set_refresh_hook(&mut self, hook: RefreshHook) {
        self.refresh_hook = Some(hook);
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn get(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn calendar(&self) -> &DayCalendar {
        &self.calendar
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar.day_of(self.clock.now_ms())
    }

    /// Returns and clears the change flag.
    ///
    /// Several mutations before a call collapse into one observed change.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn has_changes(&self) -> bool {
        self.changed
    }

    /// Reloads persisted state, replacing the in-memory list.
    ///
    /// # Errors
    /// - Propagates storage and decode errors; the in-memory list is left
    ///   untouched on failure.
    pub fn try_load(&mut self) -> RepoResult<()> {
        self.memos = self.repo.load_memos()?;
        debug!(
            "event=memo_load module=store status=ok count={}",
            self.memos.len()
        );
        Ok(())
    }

    /// Reloads persisted state; missing or unreadable data yields an empty list.
    pub fn load(&mut self) {
        if let Err(err) = self.try_load() {
            warn!(
                "event=memo_load module=store status=degraded error_code={}",
                err.code()
            );
            self.memos.clear();
        }
    }

    /// Overwrites persisted state with the full in-memory list.
    pub fn save_all(&self) -> RepoResult<()> {
        match self.repo.save_memos(&self.memos) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    "event=memo_save_all module=store status=error error_code={} count={}",
                    err.code(),
                    self.memos.len()
                );
                Err(err)
            }
        }
    }

    /// Builds a draft for the day selected in the UI.
    ///
    /// Writing onto a day before today records something already done, so
    /// the draft starts completed.
    pub fn draft(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        memo_type: MemoType,
        selected_ms: i64,
    ) -> MemoDraft {
        let is_past = self.calendar.day_of(selected_ms) < self.today();
        MemoDraft::new(title, content, selected_ms)
            .with_type(memo_type)
            .completed(is_past)
    }

    /// Replaces the memo with `id` in place, or appends a new memo.
    ///
    /// A replacement keeps the existing `id` and `date`; the draft's date is
    /// used only when appending. Returns the id of the saved memo.
    pub fn save(&mut self, draft: MemoDraft, id: Option<MemoId>) -> RepoResult<MemoId> {
        let previous = self.memos.clone();
        let existing = id.and_then(|id| self.position(id));
        let saved_id = match existing {
            Some(index) => {
                let memo = &mut self.memos[index];
                memo.title = draft.title;
                memo.content = draft.content;
                memo.is_completed = draft.is_completed;
                memo.memo_type = draft.memo_type;
                memo.id
            }
            None => {
                let memo = Memo::from_draft(draft);
                let id = memo.id;
                self.memos.push(memo);
                id
            }
        };

        self.sort_by_day();
        self.commit("memo_save", previous)?;
        info!(
            "event=memo_save module=store status=ok mode={}",
            if existing.is_some() { "replace" } else { "append" }
        );
        Ok(saved_id)
    }

    /// Removes the memo with `id`. Returns whether a memo was removed.
    pub fn delete(&mut self, id: MemoId) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=memo_delete module=store status=noop reason=not_found");
            return Ok(false);
        };
        let previous = self.memos.clone();
        self.memos.remove(index);
        self.commit("memo_delete", previous)?;
        Ok(true)
    }

    /// Flips completion of the memo with `id`.
    pub fn toggle_completion(&mut self, id: MemoId) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=memo_toggle module=store status=noop reason=not_found");
            return Ok(false);
        };
        let previous = self.memos.clone();
        let memo = &mut self.memos[index];
        memo.is_completed = !memo.is_completed;
        self.commit("memo_toggle", previous)?;
        Ok(true)
    }

    /// Moves the memos at `from` so they land before `to`.
    ///
    /// Offsets index the full list; `to` is in pre-removal coordinates.
    /// Out-of-range source offsets are skipped and `to` is clamped to the
    /// list length. Returns `false` when nothing was movable.
    pub fn move_memos(&mut self, from: &[usize], to: usize) -> RepoResult<bool> {
        let len = self.memos.len();
        let mut offsets: Vec<usize> = from.iter().copied().filter(|&index| index < len).collect();
        offsets.sort_unstable();
        offsets.dedup();
        if offsets.is_empty() {
            return Ok(false);
        }

        let previous = self.memos.clone();
        let destination = to.min(len);
        let shift = offsets.iter().filter(|&&index| index < destination).count();
        let mut moved: Vec<Memo> = offsets
            .iter()
            .rev()
            .map(|&index| self.memos.remove(index))
            .collect();
        moved.reverse();

        let insert_at = destination - shift;
        self.memos.splice(insert_at..insert_at, moved);
        self.commit("memo_move", previous)?;
        Ok(true)
    }

    /// Reschedules the memo with `id` onto `date`.
    pub fn change_date(&mut self, id: MemoId, date: i64) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=memo_change_date module=store status=noop reason=not_found");
            return Ok(false);
        };
        let previous = self.memos.clone();
        self.memos[index].date = date;
        self.sort_by_day();
        self.commit("memo_change_date", previous)?;
        Ok(true)
    }

    /// Copies a routine into a fresh, incomplete todo for now.
    ///
    /// Returns `None` when `id` is unknown or not a routine.
    pub fn add_routine_to_todos(&mut self, id: MemoId) -> RepoResult<Option<MemoId>> {
        let Some(routine) = self.get(id).filter(|memo| memo.is_routine()) else {
            debug!("event=routine_to_todo module=store status=noop reason=not_routine");
            return Ok(None);
        };
        let todo = Memo::new(
            MemoType::Todo,
            routine.title.clone(),
            routine.content.clone(),
            self.clock.now_ms(),
        );
        let todo_id = todo.id;
        let previous = self.memos.clone();
        self.memos.push(todo);
        self.sort_by_day();
        self.commit("routine_to_todo", previous)?;
        Ok(Some(todo_id))
    }

    /// Whether any memo falls on the calendar day of `on_ms`.
    pub fn has_event(&self, on_ms: i64) -> bool {
        memo_views::has_event(&self.memos, &self.calendar, self.calendar.day_of(on_ms))
    }

    /// Moves incomplete todos dated before today onto today.
    ///
    /// Completed todos stay on their original day as history.
    pub fn update_past_incomplete_memos(&mut self) -> RepoResult<usize> {
        let now = self.clock.now_ms();
        let today = self.calendar.day_of(now);
        let calendar = self.calendar;
        let previous = self.memos.clone();

        let mut moved = 0;
        for memo in &mut self.memos {
            if memo.is_todo() && !memo.is_completed && calendar.day_of(memo.date) < today {
                memo.date = now;
                moved += 1;
            }
        }

        if moved > 0 {
            self.sort_by_day();
            self.persist_step("past_incomplete", moved, previous)?;
        }
        Ok(moved)
    }

    /// Resets completed routines dated before today and records history.
    ///
    /// Each match is moved to now and marked incomplete, and a completed
    /// todo copy dated yesterday is appended.
    pub fn routine_update_completed(&mut self) -> RepoResult<usize> {
        let now = self.clock.now_ms();
        let today = self.calendar.day_of(now);
        let yesterday = self.calendar.add_days(now, -1);
        let calendar = self.calendar;
        let previous = self.memos.clone();

        let mut history = Vec::new();
        for memo in &mut self.memos {
            if memo.is_routine() && memo.is_completed && calendar.day_of(memo.date) < today {
                memo.date = now;
                memo.is_completed = false;

                let mut record =
                    Memo::new(MemoType::Todo, memo.title.clone(), memo.content.clone(), yesterday);
                record.is_completed = true;
                history.push(record);
            }
        }

        let reset = history.len();
        if reset > 0 {
            self.memos.extend(history);
            self.sort_by_day();
            self.persist_step("routine_completed", reset, previous)?;
        }
        Ok(reset)
    }

    /// Moves missed (incomplete) routines dated before today onto today.
    pub fn routine_update_incomplete(&mut self) -> RepoResult<usize> {
        let now = self.clock.now_ms();
        let today = self.calendar.day_of(now);
        let calendar = self.calendar;
        let previous = self.memos.clone();

        let mut moved = 0;
        for memo in &mut self.memos {
            if memo.is_routine() && !memo.is_completed && calendar.day_of(memo.date) < today {
                memo.date = now;
                moved += 1;
            }
        }

        if moved > 0 {
            self.sort_by_day();
            self.persist_step("routine_incomplete", moved, previous)?;
        }
        Ok(moved)
    }

    /// Runs the full daily rollover pass.
    ///
    /// The completed-routine reset must precede the missed-routine sweep: a
    /// reset routine is incomplete afterwards but already dated today, so
    /// the later sweep cannot match it again.
    pub fn run_rollover(&mut self) -> RepoResult<RolloverReport> {
        let report = RolloverReport {
            past_todos_moved: self.update_past_incomplete_memos()?,
            routines_completed: self.routine_update_completed()?,
            routines_missed: self.routine_update_incomplete()?,
        };

        info!(
            "event=rollover module=store status=ok past_todos={} routines_completed={} routines_missed={}",
            report.past_todos_moved, report.routines_completed, report.routines_missed
        );
        if !report.is_empty() {
            self.notify_refresh();
        }
        Ok(report)
    }

    pub fn memos_on(&self, day: NaiveDate) -> Vec<&Memo> {
        memo_views::memos_on(&self.memos, &self.calendar, day)
    }

    pub fn memos_from(&self, day: NaiveDate) -> Vec<&Memo> {
        memo_views::memos_from(&self.memos, &self.calendar, day)
    }

    pub fn bucket_of(&self, memo: &Memo) -> DayBucket {
        memo_views::bucket_of(&self.calendar, self.today(), memo)
    }

    pub fn memos_in_bucket(&self, bucket: DayBucket) -> Vec<&Memo> {
        memo_views::memos_in_bucket(&self.memos, &self.calendar, self.today(), bucket)
    }

    pub fn routines_today(&self) -> Vec<&Memo> {
        memo_views::routines_on(&self.memos, &self.calendar, self.today())
    }

    pub fn record_groups(&self, year_month: YearMonth) -> Vec<RecordGroup<'_>> {
        memo_views::record_groups(&self.memos, &self.calendar, year_month)
    }

    pub fn available_year_months(&self) -> Vec<YearMonth> {
        let current = YearMonth::of(self.today());
        memo_views::available_year_months(&self.memos, &self.calendar, current)
    }

    fn position(&self, id: MemoId) -> Option<usize> {
        self.memos.iter().position(|memo| memo.id == id)
    }

    fn sort_by_day(&mut self) {
        let calendar = self.calendar;
        self.memos.sort_by_key(|memo| calendar.day_of(memo.date));
    }

    /// Persists the mutated list; a failed write resets it to `previous`.
    fn commit(&mut self, event: &str, previous: Vec<Memo>) -> RepoResult<()> {
        self.write_or_restore(previous)?;
        self.changed = true;
        debug!(
            "event={} module=store status=ok count={}",
            event,
            self.memos.len()
        );
        self.notify_refresh();
        Ok(())
    }

    fn persist_step(
        &mut self,
        step: &str,
        affected: usize,
        previous: Vec<Memo>,
    ) -> RepoResult<()> {
        self.write_or_restore(previous)?;
        self.changed = true;
        debug!(
            "event=rollover_step module=store status=ok step={} affected={}",
            step, affected
        );
        Ok(())
    }

    fn write_or_restore(&mut self, previous: Vec<Memo>) -> RepoResult<()> {
        if let Err(err) = self.save_all() {
            self.memos = previous;
            return Err(err);
        }
        Ok(())
    }

    fn notify_refresh(&mut self) {
        if let Some(hook) = self.refresh_hook.as_mut() {
            hook();
        }
    }
}
