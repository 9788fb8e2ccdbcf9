use daytodo_core::{
    BlobMemoRepository, DayCalendar, FixedClock, InMemorySharedStore, Memo, MemoDraft, MemoId,
    MemoStore, MemoType, RolloverReport,
};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
// 2026-10-18T09:00:00Z
const NOW: i64 = 1_792_314_000_000;

type TestStore<'a> = MemoStore<BlobMemoRepository<&'a InMemorySharedStore>, FixedClock>;

fn store_over(shared: &InMemorySharedStore) -> TestStore<'_> {
    MemoStore::new(
        BlobMemoRepository::new(shared),
        FixedClock::new(NOW),
        DayCalendar::utc(),
    )
}

fn add(
    store: &mut TestStore<'_>,
    title: &str,
    memo_type: MemoType,
    date: i64,
    is_completed: bool,
) -> MemoId {
    let draft = MemoDraft::new(title, "notes", date)
        .with_type(memo_type)
        .completed(is_completed);
    store.save(draft, None).unwrap()
}

fn day_offset(store: &TestStore<'_>, memo: &Memo) -> i64 {
    let calendar = store.calendar();
    (calendar.day_of(memo.date) - store.today()).num_days()
}

#[test]
fn past_incomplete_todo_slides_to_today() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let open = add(&mut store, "file taxes", MemoType::Todo, NOW - DAY_MS, false);
    let done = add(&mut store, "pay rent", MemoType::Todo, NOW - DAY_MS, true);

    let moved = store.update_past_incomplete_memos().unwrap();

    assert_eq!(moved, 1);
    assert_eq!(store.get(open).unwrap().date, NOW);
    let done_memo = store.get(done).unwrap();
    assert_eq!(done_memo.date, NOW - DAY_MS);
    assert!(done_memo.is_completed);
}

#[test]
fn past_incomplete_sweep_ignores_routines_and_future_todos() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let routine = add(&mut store, "walk", MemoType::Routine, NOW - DAY_MS, false);
    let future = add(&mut store, "trip", MemoType::Todo, NOW + 3 * DAY_MS, false);

    assert_eq!(store.update_past_incomplete_memos().unwrap(), 0);
    assert_eq!(store.get(routine).unwrap().date, NOW - DAY_MS);
    assert_eq!(store.get(future).unwrap().date, NOW + 3 * DAY_MS);
}

#[test]
fn completed_routine_resets_and_leaves_history_record() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let routine = add(&mut store, "push-ups", MemoType::Routine, NOW - 2 * DAY_MS, true);

    let reset = store.routine_update_completed().unwrap();

    assert_eq!(reset, 1);
    let live = store.get(routine).unwrap();
    assert_eq!(day_offset(&store, live), 0);
    assert!(!live.is_completed);
    assert_eq!(live.memo_type, MemoType::Routine);

    let history: Vec<_> = store
        .memos()
        .iter()
        .filter(|memo| memo.id != routine)
        .collect();
    assert_eq!(history.len(), 1);
    let record = history[0];
    assert_eq!(record.memo_type, MemoType::Todo);
    assert!(record.is_completed);
    assert_eq!(record.title, "push-ups");
    assert_eq!(record.content, "notes");
    assert_eq!(day_offset(&store, record), -1);
}

#[test]
fn missed_routine_moves_to_today_without_history() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let routine = add(&mut store, "journal", MemoType::Routine, NOW - DAY_MS, false);

    let moved = store.routine_update_incomplete().unwrap();

    assert_eq!(moved, 1);
    assert_eq!(store.memos().len(), 1);
    let live = store.get(routine).unwrap();
    assert_eq!(day_offset(&store, live), 0);
    assert!(!live.is_completed);
}

#[test]
fn routine_sweeps_leave_todays_routines_alone() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let done_today = add(&mut store, "floss", MemoType::Routine, NOW, true);
    let open_today = add(&mut store, "vitamins", MemoType::Routine, NOW, false);

    assert_eq!(store.routine_update_completed().unwrap(), 0);
    assert_eq!(store.routine_update_incomplete().unwrap(), 0);
    assert!(store.get(done_today).unwrap().is_completed);
    assert!(!store.get(open_today).unwrap().is_completed);
    assert_eq!(store.memos().len(), 2);
}

#[test]
fn full_rollover_processes_completed_past_routine_once() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let routine = add(&mut store, "run", MemoType::Routine, NOW - 3 * DAY_MS, true);

    let report = store.run_rollover().unwrap();

    assert_eq!(
        report,
        RolloverReport {
            past_todos_moved: 0,
            routines_completed: 1,
            routines_missed: 0,
        }
    );
    let routines: Vec<_> = store
        .memos()
        .iter()
        .filter(|memo| memo.memo_type == MemoType::Routine)
        .collect();
    assert_eq!(routines.len(), 1);
    assert_eq!(routines[0].id, routine);
    assert!(!routines[0].is_completed);
    assert_eq!(day_offset(&store, routines[0]), 0);

    let records: Vec<_> = store
        .memos()
        .iter()
        .filter(|memo| memo.memo_type == MemoType::Todo)
        .collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_completed);
    assert_eq!(day_offset(&store, records[0]), -1);
}

#[test]
fn full_rollover_handles_mixed_list_and_persists() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    add(&mut store, "old todo", MemoType::Todo, NOW - 4 * DAY_MS, false);
    add(&mut store, "old done", MemoType::Todo, NOW - 4 * DAY_MS, true);
    add(&mut store, "done routine", MemoType::Routine, NOW - DAY_MS, true);
    add(&mut store, "missed routine", MemoType::Routine, NOW - 2 * DAY_MS, false);
    add(&mut store, "upcoming", MemoType::Todo, NOW + DAY_MS, false);
    store.take_changed();

    let report = store.run_rollover().unwrap();

    assert_eq!(report.past_todos_moved, 1);
    assert_eq!(report.routines_completed, 1);
    assert_eq!(report.routines_missed, 1);
    assert_eq!(store.memos().len(), 6);
    assert!(store.take_changed());

    let calendar = store.calendar();
    let days: Vec<_> = store
        .memos()
        .iter()
        .map(|memo| calendar.day_of(memo.date))
        .collect();
    let mut sorted = days.clone();
    sorted.sort();
    assert_eq!(days, sorted);

    let mut reloaded = store_over(&shared);
    reloaded.load();
    assert_eq!(reloaded.memos(), store.memos());
}

#[test]
fn rollover_is_idempotent_within_a_day() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    add(&mut store, "run", MemoType::Routine, NOW - DAY_MS, true);
    store.run_rollover().unwrap();
    let after_first = store.memos().to_vec();
    let writes = shared.write_count();

    let report = store.run_rollover().unwrap();

    assert!(report.is_empty());
    assert_eq!(store.memos(), after_first.as_slice());
    assert_eq!(shared.write_count(), writes);
}

#[test]
fn rollover_after_midnight_records_each_completed_day() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let routine = add(&mut store, "piano", MemoType::Routine, NOW, false);

    store.toggle_completion(routine).unwrap();
    store.clock().advance_ms(DAY_MS);
    store.run_rollover().unwrap();

    store.toggle_completion(routine).unwrap();
    store.clock().advance_ms(DAY_MS);
    store.run_rollover().unwrap();

    let records = store
        .memos()
        .iter()
        .filter(|memo| memo.memo_type == MemoType::Todo && memo.is_completed)
        .count();
    assert_eq!(records, 2);
    let live = store.get(routine).unwrap();
    assert_eq!(day_offset(&store, live), 0);
    assert!(!live.is_completed);
}
