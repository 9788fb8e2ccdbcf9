//! Memo domain record.
//!
//! # Responsibility
//! - Define the one record type persisted in shared storage.
//! - Keep the wire shape stable for every process reading the blob.
//!
//! # Invariants
//! - `id` is stable and never reused for another memo.
//! - `id` is never the nil UUID, on construction or on decode.
//! - `date` is compared by calendar day; its time-of-day is incidental.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a memo.
pub type MemoId = Uuid;

/// Memo kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoType {
    /// One-shot task.
    Todo,
    /// Daily recurring task slot, reset by rollover.
    Routine,
}

/// Validation error for memo invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    NilId,
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "memo id must not be nil"),
        }
    }
}

impl Error for MemoValidationError {}

/// Canonical memo record.
///
/// Serialized as one element of the JSON array stored under the shared
/// storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MemoWire")]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds of the due day.
    pub date: i64,
    pub is_completed: bool,
    pub memo_type: MemoType,
}

/// Editable memo fields supplied by the UI on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoDraft {
    pub title: String,
    pub content: String,
    /// Only applied when the draft creates a new memo.
    pub date: i64,
    pub is_completed: bool,
    pub memo_type: MemoType,
}

impl MemoDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, date: i64) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            date,
            is_completed: false,
            memo_type: MemoType::Todo,
        }
    }

    pub fn with_type(mut self, memo_type: MemoType) -> Self {
        self.memo_type = memo_type;
        self
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }
}

impl Memo {
    /// Creates a new incomplete memo with a generated stable ID.
    pub fn new(
        memo_type: MemoType,
        title: impl Into<String>,
        content: impl Into<String>,
        date: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            date,
            is_completed: false,
            memo_type,
        }
    }

    /// Creates a memo with a caller-provided ID.
    ///
    /// Used by import paths and tests where identity already exists.
    ///
    /// # Errors
    /// - Returns `MemoValidationError::NilId` for the nil UUID.
    pub fn with_id(
        id: MemoId,
        memo_type: MemoType,
        title: impl Into<String>,
        content: impl Into<String>,
        date: i64,
    ) -> Result<Self, MemoValidationError> {
        let memo = Self {
            id,
            title: title.into(),
            content: content.into(),
            date,
            is_completed: false,
            memo_type,
        };
        memo.validate()?;
        Ok(memo)
    }

    /// Materializes a draft as a brand-new memo.
    pub fn from_draft(draft: MemoDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            date: draft.date,
            is_completed: draft.is_completed,
            memo_type: draft.memo_type,
        }
    }

    /// Validates model invariants.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if self.id.is_nil() {
            return Err(MemoValidationError::NilId);
        }
        Ok(())
    }

    pub fn is_todo(&self) -> bool {
        self.memo_type == MemoType::Todo
    }

    pub fn is_routine(&self) -> bool {
        self.memo_type == MemoType::Routine
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemoWire {
    id: MemoId,
    title: String,
    content: String,
    date: i64,
    #[serde(default)]
    is_completed: bool,
    memo_type: MemoType,
}

impl TryFrom<MemoWire> for Memo {
    type Error = MemoValidationError;

    fn try_from(value: MemoWire) -> Result<Self, Self::Error> {
        let memo = Self {
            id: value.id,
            title: value.title,
            content: value.content,
            date: value.date,
            is_completed: value.is_completed,
            memo_type: value.memo_type,
        };
        memo.validate()?;
        Ok(memo)
    }
}
