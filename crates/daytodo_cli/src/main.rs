//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `daytodo_core` linkage without the Flutter runtime.
//! - Optionally print the widget view of a shared database file.
//!
//! Usage: `daytodo_cli [shared-db-path]`

use daytodo_core::db::open_db_read_only;
use daytodo_core::{BlobMemoRepository, SqliteSharedStore, StoreConfig, SystemClock, WidgetService};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("daytodo_core ping={}", daytodo_core::ping());
    println!("daytodo_core version={}", daytodo_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_widget_view(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("daytodo_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_widget_view(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::default();
    let conn = open_db_read_only(db_path)?;
    let store = SqliteSharedStore::read_only(&conn)?;
    let repo = BlobMemoRepository::with_key(store, config.storage_key.clone());
    let snapshot = WidgetService::new(repo, SystemClock, &config)?.snapshot();

    println!("widget day={} entries={}", snapshot.day, snapshot.entries.len());
    for entry in &snapshot.entries {
        let mark = if entry.memo.is_completed { "x" } else { " " };
        let when = if entry.is_today { "today" } else { "later" };
        println!("[{mark}] {when} {}", entry.memo.title);
    }
    Ok(())
}
