//! Memo persistence.
//!
//! The engine only depends on the [`MemoStore`] trait; the surrounding
//! application chooses the backing. [`MemoryStore`] serves tests and
//! ephemeral runs, [`MemoDb`](memo_db::MemoDb) is the SQLite-backed store
//! the CLI uses.

pub mod memo_db;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;
use crate::memo::Memo;

pub use memo_db::MemoDb;

/// Resolve (and create) the application data directory,
/// `~/.config/dayweave` on Linux.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base = dirs::config_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
    })?;
    let dir = base.join("dayweave");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Persistence seam for memos.
///
/// The engine loads, mutates and writes back whole memos; reactions are
/// applied one memo at a time, which is the per-memo mutual exclusion the
/// concurrency contract asks the caller to uphold.
pub trait MemoStore {
    fn list(&self) -> Result<Vec<Memo>, StorageError>;
    fn get(&self, id: &str) -> Result<Option<Memo>, StorageError>;
    fn upsert(&mut self, memo: &Memo) -> Result<(), StorageError>;
    /// Returns whether a memo was actually removed.
    fn delete(&mut self, id: &str) -> Result<bool, StorageError>;
}

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    memos: HashMap<String, Memo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }
}

impl MemoStore for MemoryStore {
    fn list(&self) -> Result<Vec<Memo>, StorageError> {
        let mut memos: Vec<Memo> = self.memos.values().cloned().collect();
        memos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(memos)
    }

    fn get(&self, id: &str) -> Result<Option<Memo>, StorageError> {
        Ok(self.memos.get(id).cloned())
    }

    fn upsert(&mut self, memo: &Memo) -> Result<(), StorageError> {
        self.memos.insert(memo.id.clone(), memo.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        Ok(self.memos.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{create_memo, FallbackEnricher, MemoDraft};
    use crate::memo::MemoKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn memory_store_round_trip() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
        let memo = create_memo(
            MemoDraft::new("sort photos", MemoKind::Backlog),
            &FallbackEnricher,
            now,
        );
        let mut store = MemoryStore::new();
        store.upsert(&memo).unwrap();
        assert_eq!(store.get(&memo.id).unwrap(), Some(memo.clone()));
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(store.delete(&memo.id).unwrap());
        assert!(!store.delete(&memo.id).unwrap());
        assert!(store.get(&memo.id).unwrap().is_none());
    }
}
