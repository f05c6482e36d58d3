//! SQLite-backed memo store.
//!
//! Memos are stored as JSON documents in a single table, one row per memo,
//! with the kind denormalized for filtering. The schema is created on open.

use chrono::Utc;
use indoc::indoc;
use rusqlite::{params, Connection};
use tracing::warn;

use crate::error::StorageError;
use crate::memo::Memo;

use super::{data_dir, MemoStore};

/// SQLite database holding the memo collection.
pub struct MemoDb {
    conn: Connection,
}

impl MemoDb {
    /// Open the database at `~/.config/dayweave/dayweave.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("dayweave.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(indoc! {"
                CREATE TABLE IF NOT EXISTS memos (
                    id         TEXT PRIMARY KEY,
                    kind       TEXT NOT NULL,
                    document   TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_memos_kind ON memos(kind);
            "})
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    fn decode(id: &str, document: &str) -> Result<Memo, StorageError> {
        serde_json::from_str(document).map_err(|e| StorageError::CorruptRecord {
            memo_id: id.to_string(),
            message: e.to_string(),
        })
    }
}

impl MemoStore for MemoDb {
    fn list(&self) -> Result<Vec<Memo>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, document FROM memos ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        // A corrupt row is skipped with a warning; it must not take the
        // rest of the collection down with it.
        let mut memos = Vec::new();
        for row in rows {
            let (id, document) = row?;
            match Self::decode(&id, &document) {
                Ok(memo) => memos.push(memo),
                Err(err) => warn!(memo_id = %id, %err, "skipping corrupt memo record"),
            }
        }
        Ok(memos)
    }

    fn get(&self, id: &str) -> Result<Option<Memo>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM memos WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => {
                let document: String = row.get(0)?;
                Self::decode(id, &document).map(Some)
            }
            None => Ok(None),
        }
    }

    fn upsert(&mut self, memo: &Memo) -> Result<(), StorageError> {
        let document = serde_json::to_string(memo).map_err(|e| StorageError::CorruptRecord {
            memo_id: memo.id.clone(),
            message: e.to_string(),
        })?;
        self.conn.execute(
            indoc! {"
                INSERT INTO memos (id, kind, document, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    kind = excluded.kind,
                    document = excluded.document,
                    updated_at = excluded.updated_at
            "},
            params![
                memo.id,
                memo.kind.as_str(),
                document,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
