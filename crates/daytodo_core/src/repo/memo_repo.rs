//! Memo list repository over the shared key-value port.
//!
//! # Responsibility
//! - Encode the full memo list as one JSON array and store it under a key.
//! - Decode the blob back into memos with explicit, typed failures.
//!
//! # Invariants
//! - Writes always replace the whole list.
//! - An absent key decodes to an empty list; a corrupt blob is an error here
//!   and is degraded to empty only by the store facade.

use crate::config::DEFAULT_STORAGE_KEY;
use crate::model::memo::Memo;
use crate::storage::{SharedStore, StorageError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo list persistence.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl RepoError {
    /// Stable, payload-free code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage_failed",
            Self::Decode(_) => "decode_failed",
            Self::Encode(_) => "encode_failed",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "invalid persisted memo data: {err}"),
            Self::Encode(err) => write!(f, "failed to encode memos: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Read side of memo persistence; all a secondary reader gets.
pub trait MemoSource {
    fn load_memos(&self) -> RepoResult<Vec<Memo>>;
}

/// Whole-list memo persistence for the single writer.
pub trait MemoRepository: MemoSource {
    fn save_memos(&self, memos: &[Memo]) -> RepoResult<()>;
}

/// Stores the memo list as a JSON blob in a `SharedStore`.
pub struct BlobMemoRepository<S: SharedStore> {
    store: S,
    key: String,
}

impl<S: SharedStore> BlobMemoRepository<S> {
    /// Uses the default shared key (`memos`).
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: SharedStore> MemoSource for BlobMemoRepository<S> {
    fn load_memos(&self) -> RepoResult<Vec<Memo>> {
        match self.store.get(&self.key)? {
            Some(bytes) => decode_memos(&bytes),
            None => Ok(Vec::new()),
        }
    }
}

impl<S: SharedStore> MemoRepository for BlobMemoRepository<S> {
    fn save_memos(&self, memos: &[Memo]) -> RepoResult<()> {
        let bytes = encode_memos(memos)?;
        self.store.set(&self.key, &bytes)?;
        Ok(())
    }
}

/// Encodes memos into the shared JSON wire format.
pub fn encode_memos(memos: &[Memo]) -> RepoResult<Vec<u8>> {
    serde_json::to_vec(memos).map_err(RepoError::Encode)
}

/// Decodes memos from the shared JSON wire format.
pub fn decode_memos(bytes: &[u8]) -> RepoResult<Vec<Memo>> {
    serde_json::from_slice(bytes).map_err(RepoError::Decode)
}
