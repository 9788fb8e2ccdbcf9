//! In-memory shared store for tests and ephemeral sessions.

use super::{SharedStore, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemorySharedStore {
    entries: RefCell<HashMap<String, Vec<u8>>>,
    writes: Cell<usize>,
}

impl InMemorySharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw bytes, bypassing write accounting.
    pub fn with_entry(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.entries.borrow_mut().insert(key.to_string(), value.into());
        store
    }

    /// Number of `set` calls observed so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl SharedStore for InMemorySharedStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
