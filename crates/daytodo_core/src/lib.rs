//! Core domain logic for DayTodo.
//! This crate owns the memo list, its rollover rules and shared persistence;
//! the host app and the widget are consumers of it.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use calendar::DayCalendar;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY, DEFAULT_WIDGET_LIMIT};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::memo::{Memo, MemoDraft, MemoId, MemoType, MemoValidationError};
pub use model::year_month::{YearMonth, YearMonthParseError};
pub use repo::memo_repo::{
    decode_memos, encode_memos, BlobMemoRepository, MemoRepository, MemoSource, RepoError,
    RepoResult,
};
pub use service::memo_store::{MemoStore, RefreshHook, RolloverReport};
pub use service::memo_views::{DayBucket, RecordGroup};
pub use service::widget_service::{WidgetEntry, WidgetService, WidgetSnapshot};
pub use storage::{
    InMemorySharedStore, SharedStore, SqliteSharedStore, StorageError, StorageResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
