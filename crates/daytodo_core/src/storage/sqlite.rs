//! SQLite-backed shared store.
//!
//! # Responsibility
//! - Persist byte blobs in the `shared_kv` table of the app-group database.
//! - Refuse connections that were not bootstrapped by `db::open_db`.
//!
//! # Invariants
//! - A store built with `read_only` never issues SQL writes.

use super::{SharedStore, StorageError, StorageResult};
use crate::db::migrations::{current_user_version, latest_version};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};

const SHARED_KV_TABLE: &str = "shared_kv";

pub struct SqliteSharedStore<'conn> {
    conn: &'conn Connection,
    read_only: bool,
}

impl<'conn> SqliteSharedStore<'conn> {
    /// Wraps a migrated connection for reads and writes.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when `shared_kv` is absent.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_schema(conn)?;
        Ok(Self {
            conn,
            read_only: false,
        })
    }

    /// Wraps a connection for reads only.
    ///
    /// The schema version may lag the latest one (an older host app wrote
    /// it), but the table must exist.
    pub fn read_only(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_table(conn)?;
        Ok(Self {
            conn,
            read_only: true,
        })
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl SharedStore for SqliteSharedStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM shared_kv WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        debug!(
            "event=kv_get module=storage status=ok found={} bytes={}",
            value.is_some(),
            value.as_ref().map_or(0, Vec::len)
        );
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.read_only {
            error!("event=kv_set module=storage status=error error_code=read_only");
            return Err(StorageError::ReadOnly);
        }

        self.conn.execute(
            "INSERT INTO shared_kv (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=storage status=ok bytes={}",
            value.len()
        );
        Ok(())
    }
}

fn ensure_schema(conn: &Connection) -> StorageResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    ensure_table(conn)
}

fn ensure_table(conn: &Connection) -> StorageResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [SHARED_KV_TABLE],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(StorageError::MissingRequiredTable(SHARED_KV_TABLE));
    }
    Ok(())
}
