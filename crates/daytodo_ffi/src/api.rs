//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose memo, rollover, record and widget use-cases to Dart via FRB.
//! - Enforce UI-boundary rules (non-empty title, well-formed ids).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Host-app calls are serialized process-wide; each call loads, mutates and
//!   persists the full list.
//! - Widget calls only ever open the shared database read-only.
//! - Every call opens a fresh `MemoStore`, so the core refresh hook has no
//!   listener here. The `changed` field of action and rollover responses is
//!   the host's data-changed signal; Dart reloads widget timelines on it.

use daytodo_core::db::{open_db, open_db_read_only};
use daytodo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BlobMemoRepository, Memo, MemoId, MemoStore, MemoType, SqliteSharedStore, StoreConfig,
    SystemClock, WidgetService, YearMonth,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const SHARED_DB_FILE_NAME: &str = "daytodo_shared.sqlite3";
const SHARED_DB_PATH_ENV: &str = "DAYTODO_DB_PATH";
static SHARED_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

type HostStore<'conn> = MemoStore<BlobMemoRepository<SqliteSharedStore<'conn>>, SystemClock>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Memo row as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Due day as Unix epoch milliseconds.
    pub date_epoch_ms: i64,
    pub is_completed: bool,
    /// `todo|routine`.
    pub memo_type: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoActionResponse {
    /// Whether the operation ran (an unknown id still counts as ok).
    pub ok: bool,
    /// Whether the list was actually modified.
    pub changed: bool,
    /// Saved or created memo ID.
    pub memo_id: Option<String>,
    pub message: String,
}

impl MemoActionResponse {
    fn success(message: impl Into<String>, changed: bool, memo_id: Option<String>) -> Self {
        Self {
            ok: true,
            changed,
            memo_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            memo_id: None,
            message: message.into(),
        }
    }
}

/// Full list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoListResponse {
    pub items: Vec<MemoItem>,
    pub message: String,
}

/// Rollover pass counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverResponse {
    pub ok: bool,
    /// Whether any step rewrote shared storage.
    pub changed: bool,
    pub past_todos_moved: u32,
    pub routines_completed: u32,
    pub routines_missed: u32,
    pub message: String,
}

/// One day of completed memos in the record view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGroupItem {
    /// Local midnight of the group day, epoch milliseconds.
    pub day_start_epoch_ms: i64,
    pub items: Vec<MemoItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResponse {
    pub groups: Vec<RecordGroupItem>,
    pub message: String,
}

/// Widget row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetItem {
    pub memo: MemoItem,
    pub is_today: bool,
}

/// Widget timeline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetResponse {
    pub items: Vec<WidgetItem>,
    /// Next local midnight, epoch milliseconds.
    pub next_refresh_epoch_ms: i64,
    pub message: String,
}

/// Lists all memos in stored order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; storage failures yield an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_list() -> MemoListResponse {
    match with_store(|store| Ok(store.memos().iter().map(to_memo_item).collect::<Vec<_>>())) {
        Ok(items) => MemoListResponse {
            message: format!("Loaded {} memo(s).", items.len()),
            items,
        },
        Err(err) => MemoListResponse {
            items: Vec::new(),
            message: format!("memo_list failed: {err}"),
        },
    }
}

/// Creates a memo, or edits the memo with `id` (keeping its date).
///
/// Input semantics:
/// - `memo_type`: `todo|routine` (case-insensitive).
/// - `selected_epoch_ms`: day picked in the calendar; ignored for edits.
/// - A memo created on a day before today is saved as completed.
///
/// # FFI contract
/// - Rejects an empty title and malformed ids without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_save(
    title: String,
    content: String,
    memo_type: String,
    selected_epoch_ms: i64,
    id: Option<String>,
) -> MemoActionResponse {
    let title = title.trim().to_string();
    if title.is_empty() {
        return MemoActionResponse::failure("memo_save failed: title cannot be empty");
    }
    let Some(memo_type) = parse_memo_type(&memo_type) else {
        return MemoActionResponse::failure(format!(
            "memo_save failed: unsupported memo type `{memo_type}`"
        ));
    };
    let id = match id.as_deref().map(parse_memo_id).transpose() {
        Ok(id) => id,
        Err(message) => return MemoActionResponse::failure(message),
    };

    let result = with_store(|store| {
        let draft = store.draft(title, content, memo_type, selected_epoch_ms);
        store.save(draft, id).map_err(|err| err.to_string())
    });
    match result {
        Ok(saved) => MemoActionResponse::success("Memo saved.", true, Some(saved.to_string())),
        Err(err) => MemoActionResponse::failure(format!("memo_save failed: {err}")),
    }
}

/// Deletes a memo; unknown ids succeed with `changed = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_delete(id: String) -> MemoActionResponse {
    run_id_action("memo_delete", &id, |store, id| store.delete(id))
}

/// Flips completion of a memo; unknown ids succeed with `changed = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_toggle(id: String) -> MemoActionResponse {
    run_id_action("memo_toggle", &id, |store, id| store.toggle_completion(id))
}

/// Reschedules a memo onto the day of `date_epoch_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_change_date(id: String, date_epoch_ms: i64) -> MemoActionResponse {
    run_id_action("memo_change_date", &id, |store, id| {
        store.change_date(id, date_epoch_ms)
    })
}

/// Reorders memos by full-list offsets.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_move(from_offsets: Vec<u32>, to_offset: u32) -> MemoActionResponse {
    let from: Vec<usize> = from_offsets.into_iter().map(|offset| offset as usize).collect();
    match with_store(|store| {
        store
            .move_memos(&from, to_offset as usize)
            .map_err(|err| err.to_string())
    }) {
        Ok(changed) => MemoActionResponse::success("Memos moved.", changed, None),
        Err(err) => MemoActionResponse::failure(format!("memo_move failed: {err}")),
    }
}

/// Copies a routine into today's to-do list.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_add_to_todos(id: String) -> MemoActionResponse {
    let id = match parse_memo_id(&id) {
        Ok(id) => id,
        Err(message) => return MemoActionResponse::failure(message),
    };
    match with_store(|store| store.add_routine_to_todos(id).map_err(|err| err.to_string())) {
        Ok(Some(todo_id)) => {
            MemoActionResponse::success("Routine added to to-do list.", true, Some(todo_id.to_string()))
        }
        Ok(None) => MemoActionResponse::success("No routine with that id.", false, None),
        Err(err) => MemoActionResponse::failure(format!("routine_add_to_todos failed: {err}")),
    }
}

/// Runs the daily rollover pass. Call on every app activation.
#[flutter_rust_bridge::frb(sync)]
pub fn rollover_run() -> RolloverResponse {
    let result = with_store(|store| {
        store
            .run_rollover()
            .map(|report| (report, store.take_changed()))
            .map_err(|err| err.to_string())
    });
    match result {
        Ok((report, changed)) => RolloverResponse {
            ok: true,
            changed,
            past_todos_moved: clamp_count(report.past_todos_moved),
            routines_completed: clamp_count(report.routines_completed),
            routines_missed: clamp_count(report.routines_missed),
            message: "Rollover complete.".to_string(),
        },
        Err(err) => RolloverResponse {
            ok: false,
            changed: false,
            past_todos_moved: 0,
            routines_completed: 0,
            routines_missed: 0,
            message: format!("rollover_run failed: {err}"),
        },
    }
}

/// Whether any memo falls on the calendar day of `epoch_ms`.
///
/// Storage failures answer `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_has_event(epoch_ms: i64) -> bool {
    with_store(|store| Ok(store.has_event(epoch_ms))).unwrap_or(false)
}

/// Months with any memo, newest first, as `YYYY-MM`.
#[flutter_rust_bridge::frb(sync)]
pub fn record_year_months() -> Vec<String> {
    with_store(|store| {
        Ok(store
            .available_year_months()
            .into_iter()
            .map(|month| month.to_string())
            .collect())
    })
    .unwrap_or_default()
}

/// Completed memos of `year_month` (`YYYY-MM` or `YYYY년 M월`) grouped by day.
#[flutter_rust_bridge::frb(sync)]
pub fn record_groups(year_month: String) -> RecordResponse {
    let month = match year_month.parse::<YearMonth>() {
        Ok(month) => month,
        Err(err) => {
            return RecordResponse {
                groups: Vec::new(),
                message: format!("record_groups failed: {err}"),
            }
        }
    };

    let result = with_store(|store| {
        let calendar = *store.calendar();
        Ok(store
            .record_groups(month)
            .into_iter()
            .map(|group| RecordGroupItem {
                day_start_epoch_ms: calendar.start_of_day(group.day),
                items: group.memos.into_iter().map(to_memo_item).collect(),
            })
            .collect::<Vec<_>>())
    });
    match result {
        Ok(groups) => RecordResponse {
            message: format!("Found {} day(s).", groups.len()),
            groups,
        },
        Err(err) => RecordResponse {
            groups: Vec::new(),
            message: format!("record_groups failed: {err}"),
        },
    }
}

/// Builds the home-screen widget timeline entry.
///
/// # FFI contract
/// - Opens the shared database read-only; never writes.
/// - A database the host app has not created yet yields an empty entry.
#[flutter_rust_bridge::frb(sync)]
pub fn widget_snapshot() -> WidgetResponse {
    let config = StoreConfig::default();
    let empty = |message: String| WidgetResponse {
        items: Vec::new(),
        next_refresh_epoch_ms: 0,
        message,
    };

    let conn = match open_db_read_only(resolve_shared_db_path()) {
        Ok(conn) => conn,
        Err(err) => return empty(format!("widget_snapshot degraded: {err}")),
    };
    let store = match SqliteSharedStore::read_only(&conn) {
        Ok(store) => store,
        Err(err) => return empty(format!("widget_snapshot degraded: {err}")),
    };
    let repo = BlobMemoRepository::with_key(store, config.storage_key.clone());
    let widget = match WidgetService::new(repo, SystemClock, &config) {
        Ok(widget) => widget,
        Err(err) => return empty(format!("widget_snapshot failed: {err}")),
    };

    let snapshot = widget.snapshot();
    WidgetResponse {
        message: format!("Showing {} memo(s).", snapshot.entries.len()),
        items: snapshot
            .entries
            .iter()
            .map(|entry| WidgetItem {
                memo: to_memo_item(&entry.memo),
                is_today: entry.is_today,
            })
            .collect(),
        next_refresh_epoch_ms: snapshot.next_refresh_ms,
    }
}

fn run_id_action(
    operation: &str,
    raw_id: &str,
    action: impl FnOnce(&mut HostStore<'_>, MemoId) -> daytodo_core::RepoResult<bool>,
) -> MemoActionResponse {
    let id = match parse_memo_id(raw_id) {
        Ok(id) => id,
        Err(message) => return MemoActionResponse::failure(message),
    };
    match with_store(|store| action(store, id).map_err(|err| err.to_string())) {
        Ok(true) => MemoActionResponse::success("Done.", true, Some(id.to_string())),
        Ok(false) => MemoActionResponse::success("No memo with that id.", false, None),
        Err(err) => MemoActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn resolve_shared_db_path() -> PathBuf {
    SHARED_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(SHARED_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(SHARED_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(f: impl FnOnce(&mut HostStore<'_>) -> Result<T, String>) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let config = StoreConfig::default();
    let db_path = resolve_shared_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("shared DB open failed: {err}"))?;
    let shared = SqliteSharedStore::try_new(&conn)
        .map_err(|err| format!("shared store init failed: {err}"))?;
    let repo = BlobMemoRepository::with_key(shared, config.storage_key.clone());
    let mut store = MemoStore::open(repo, SystemClock, &config)
        .map_err(|err| format!("store config invalid: {err}"))?;
    f(&mut store)
}

fn parse_memo_id(raw: &str) -> Result<MemoId, String> {
    MemoId::parse_str(raw.trim()).map_err(|_| format!("invalid memo id `{}`", raw.trim()))
}

fn parse_memo_type(raw: &str) -> Option<MemoType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "todo" => Some(MemoType::Todo),
        "routine" => Some(MemoType::Routine),
        _ => None,
    }
}

fn memo_type_label(memo_type: MemoType) -> &'static str {
    match memo_type {
        MemoType::Todo => "todo",
        MemoType::Routine => "routine",
    }
}

fn to_memo_item(memo: &Memo) -> MemoItem {
    MemoItem {
        id: memo.id.to_string(),
        title: memo.title.clone(),
        content: memo.content.clone(),
        date_epoch_ms: memo.date,
        is_completed: memo.is_completed,
        memo_type: memo_type_label(memo.memo_type).to_string(),
    }
}

fn clamp_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| {
        warn!("event=ffi_count_clamped module=ffi status=warn value={value}");
        u32::MAX
    })
}
