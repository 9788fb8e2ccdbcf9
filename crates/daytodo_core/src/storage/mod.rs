//! Shared key-value persistence port.
//!
//! # Responsibility
//! - Define the byte-blob get/set contract shared by host app and widget.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set` overwrites the whole value for a key; there are no partial writes.
//! - Only the host app writes. Secondary readers hold a read-only store and
//!   there is no cross-process locking beyond SQLite's own.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::InMemorySharedStore;
pub use sqlite::SqliteSharedStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by shared storage backends.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Write attempted through a read-only store.
    ReadOnly,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::ReadOnly => write!(f, "shared store is read-only"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value namespace readable by every process of the app group.
pub trait SharedStore {
    /// Returns the stored bytes, or `None` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()>;
}

impl<S: SharedStore + ?Sized> SharedStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
