//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file, in-memory or read-only SQLite connections.
//! - Trigger schema migrations before returning a writable connection.
//!
//! # Invariants
//! - Writable connections have migrations fully applied.
//! - Read-only connections reject schemas newer than this binary.

use super::migrations::{apply_migrations, current_user_version, latest_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the shared database file and applies all pending migrations.
///
/// Used by the host app, the single writer of shared state.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = Connection::open(path);
    finish_open(conn, started_at, "file", |conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(conn)
    })
}

/// Opens an in-memory database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = Connection::open_in_memory();
    finish_open(conn, started_at, "memory", apply_migrations)
}

/// Opens the shared database file without write access.
///
/// Used by secondary readers (the widget). No migration is attempted, so a
/// database not yet created by the host app is an error for the caller to
/// degrade on.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=read_only");

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    );
    finish_open(conn, started_at, "read_only", |conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let version = current_user_version(conn)?;
        let latest = latest_version();
        if version > latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            });
        }
        Ok(())
    })
}

fn finish_open(
    conn: rusqlite::Result<Connection>,
    started_at: Instant,
    mode: &str,
    bootstrap: impl FnOnce(&mut Connection) -> DbResult<()>,
) -> DbResult<Connection> {
    let mut conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
