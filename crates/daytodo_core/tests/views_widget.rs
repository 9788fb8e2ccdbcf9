use chrono::NaiveDate;
use daytodo_core::db::{open_db, open_db_read_only};
use daytodo_core::{
    BlobMemoRepository, DayBucket, DayCalendar, FixedClock, InMemorySharedStore, MemoDraft,
    MemoStore, MemoType, SqliteSharedStore, StoreConfig, WidgetService, YearMonth,
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

fn utc_config() -> StoreConfig {
    StoreConfig::with_offset_minutes(0)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn day_filters_select_exact_and_onward_days() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    store.save(MemoDraft::new("yesterday", "", NOW - DAY_MS), None).unwrap();
    store.save(MemoDraft::new("today", "", NOW), None).unwrap();
    store.save(MemoDraft::new("next week", "", NOW + 7 * DAY_MS), None).unwrap();

    let today: Vec<_> = store
        .memos_on(date(2026, 10, 18))
        .into_iter()
        .map(|memo| memo.title.as_str())
        .collect();
    assert_eq!(today, vec!["today"]);

    let onward: Vec<_> = store
        .memos_from(date(2026, 10, 18))
        .into_iter()
        .map(|memo| memo.title.as_str())
        .collect();
    assert_eq!(onward, vec!["today", "next week"]);
}

#[test]
fn buckets_split_today_tomorrow_and_later() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    store.save(MemoDraft::new("now", "", NOW), None).unwrap();
    store.save(MemoDraft::new("soon", "", NOW + DAY_MS), None).unwrap();
    store.save(MemoDraft::new("someday", "", NOW + 30 * DAY_MS), None).unwrap();

    assert_eq!(store.memos_in_bucket(DayBucket::Today).len(), 1);
    assert_eq!(store.memos_in_bucket(DayBucket::Tomorrow)[0].title, "soon");
    assert_eq!(store.memos_in_bucket(DayBucket::Later)[0].title, "someday");
    assert!(store.memos_in_bucket(DayBucket::Past).is_empty());
    assert_eq!(store.bucket_of(&store.memos()[0]), DayBucket::Today);
}

#[test]
fn routines_today_lists_only_todays_routine_slots() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    store
        .save(MemoDraft::new("yoga", "", NOW).with_type(MemoType::Routine), None)
        .unwrap();
    store
        .save(
            MemoDraft::new("tomorrow yoga", "", NOW + DAY_MS).with_type(MemoType::Routine),
            None,
        )
        .unwrap();
    store.save(MemoDraft::new("errand", "", NOW), None).unwrap();

    let titles: Vec<_> = store
        .routines_today()
        .into_iter()
        .map(|memo| memo.title.as_str())
        .collect();
    assert_eq!(titles, vec!["yoga"]);
}

#[test]
fn record_groups_keep_completed_memos_of_month_newest_day_first() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    let early = NOW - 10 * DAY_MS; // 2026-10-08
    let late = NOW - 2 * DAY_MS; // 2026-10-16
    let last_month = NOW - 20 * DAY_MS; // 2026-09-28
    store.save(MemoDraft::new("a", "", early).completed(true), None).unwrap();
    store.save(MemoDraft::new("b", "", late).completed(true), None).unwrap();
    store.save(MemoDraft::new("c", "", late).completed(true), None).unwrap();
    store.save(MemoDraft::new("open", "", late), None).unwrap();
    store.save(MemoDraft::new("sept", "", last_month).completed(true), None).unwrap();

    let october = YearMonth::new(2026, 10).unwrap();
    let groups = store.record_groups(october);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].day, date(2026, 10, 16));
    let titles: Vec<_> = groups[0].memos.iter().map(|memo| memo.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "c"]);
    assert_eq!(groups[1].day, date(2026, 10, 8));
    assert_eq!(groups[1].memos.len(), 1);
}

#[test]
fn available_year_months_are_distinct_descending_and_capped() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    store.save(MemoDraft::new("aug", "", NOW - 60 * DAY_MS), None).unwrap();
    store.save(MemoDraft::new("oct", "", NOW), None).unwrap();
    store.save(MemoDraft::new("oct 2", "", NOW + DAY_MS), None).unwrap();
    store.save(MemoDraft::new("dec", "", NOW + 60 * DAY_MS), None).unwrap();

    let months = store.available_year_months();

    assert_eq!(
        months,
        vec![
            YearMonth::new(2026, 10).unwrap(),
            YearMonth::new(2026, 8).unwrap(),
        ]
    );
}

#[test]
fn widget_snapshot_takes_first_six_from_today_onward() {
    let shared = InMemorySharedStore::new();
    let mut store = store_over(&shared);
    store.save(MemoDraft::new("old", "", NOW - DAY_MS), None).unwrap();
    for index in 0..8 {
        store
            .save(MemoDraft::new(format!("item {index}"), "", NOW + index * DAY_MS), None)
            .unwrap();
    }

    let widget = WidgetService::new(
        BlobMemoRepository::new(&shared),
        FixedClock::new(NOW),
        &utc_config(),
    )
    .unwrap();
    let snapshot = widget.snapshot();

    assert_eq!(snapshot.day, date(2026, 10, 18));
    assert_eq!(snapshot.entries.len(), 6);
    assert_eq!(snapshot.entries[0].memo.title, "item 0");
    assert!(snapshot.entries[0].is_today);
    assert!(!snapshot.entries[1].is_today);
    assert_eq!(snapshot.entries[5].memo.title, "item 5");
    assert_eq!(
        snapshot.next_refresh_ms,
        DayCalendar::utc().start_of_day(date(2026, 10, 19))
    );
}

#[test]
fn widget_snapshot_degrades_to_empty_on_corrupt_blob() {
    let shared = InMemorySharedStore::with_entry("memos", "garbage");
    let widget = WidgetService::new(
        BlobMemoRepository::new(&shared),
        FixedClock::new(NOW),
        &utc_config(),
    )
    .unwrap();

    assert!(widget.snapshot().entries.is_empty());
}

#[test]
fn widget_reads_host_database_through_read_only_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("group.db");
    {
        let conn = open_db(&path).unwrap();
        let mut host = MemoStore::new(
            BlobMemoRepository::new(SqliteSharedStore::try_new(&conn).unwrap()),
            FixedClock::new(NOW),
            DayCalendar::utc(),
        );
        host.save(MemoDraft::new("from host", "", NOW), None).unwrap();
    }

    let conn = open_db_read_only(&path).unwrap();
    let widget = WidgetService::new(
        BlobMemoRepository::new(SqliteSharedStore::read_only(&conn).unwrap()),
        FixedClock::new(NOW),
        &utc_config(),
    )
    .unwrap();

    let snapshot = widget.snapshot();
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].memo.title, "from host");
}

#[test]
fn widget_snapshot_tolerates_extreme_stored_dates_under_offsets() {
    let blob = format!(
        r#"[{{"id":"{}","title":"ancient","content":"","date":{},"memoType":"Todo"}},{{"id":"{}","title":"far","content":"","date":{},"memoType":"Routine"}}]"#,
        uuid::Uuid::new_v4(),
        i64::MIN,
        uuid::Uuid::new_v4(),
        i64::MAX
    );

    for offset_minutes in [-4 * 60, 9 * 60] {
        let shared = InMemorySharedStore::with_entry("memos", blob.clone());
        let widget = WidgetService::new(
            BlobMemoRepository::new(&shared),
            FixedClock::new(NOW),
            &StoreConfig::with_offset_minutes(offset_minutes),
        )
        .unwrap();

        let snapshot = widget.snapshot();

        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].memo.title, "far");
        assert!(!snapshot.entries[0].is_today);
        assert!(snapshot.next_refresh_ms > NOW);
    }
}
