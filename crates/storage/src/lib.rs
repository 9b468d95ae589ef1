//! Sqlite persistence for the commit ledger.
//!
//! Owns the schema and implements [`LedgerRepository`]. Commits are appended
//! to a log table and a per-label counter; the pipeline never reads them back
//! into classification.

use handsign_events::{CommitRecord, LabelCount, LedgerError, LedgerRepository};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("bad record: {0}")]
    BadRecord(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS commit_log (
                id TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                ts_ms INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS label_counts (
                label TEXT PRIMARY KEY,
                count INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_commit_log_ts ON commit_log(ts_ms DESC);
            "#,
        )?;
        Ok(())
    }

    fn append(&self, record: &CommitRecord) -> Result<()> {
        let mut conn = self.conn.lock().expect("database mutex poisoned");
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO commit_log (id, label, ts_ms) VALUES (?1, ?2, ?3)",
            (
                record.id.to_string(),
                &record.label,
                record.ts.timestamp_millis(),
            ),
        )?;
        tx.execute(
            "INSERT INTO label_counts (label, count) VALUES (?1, 1)
             ON CONFLICT(label) DO UPDATE SET count = count + 1",
            [&record.label],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn label_counts(&self) -> Result<Vec<LabelCount>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT label, count FROM label_counts ORDER BY count DESC, label ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(LabelCount {
                label: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)
    }

    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn
            .prepare("SELECT id, label, ts_ms FROM commit_log ORDER BY ts_ms DESC LIMIT ?1")?;
        let rows = stmt.query_map([limit as i64], |row| {
            let id: String = row.get(0)?;
            let label: String = row.get(1)?;
            let ts_ms: i64 = row.get(2)?;
            Ok((id, label, ts_ms))
        })?;
        let mut records = Vec::new();
        for row in rows {
            let (id, label, ts_ms) = row?;
            let id = Uuid::parse_str(&id)
                .map_err(|e| StorageError::BadRecord(format!("commit id {id}: {e}")))?;
            let ts = chrono::DateTime::from_timestamp_millis(ts_ms)
                .ok_or_else(|| StorageError::BadRecord(format!("commit timestamp {ts_ms}")))?;
            records.push(CommitRecord { id, label, ts });
        }
        Ok(records)
    }

    fn clear_all(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute_batch("DELETE FROM commit_log; DELETE FROM label_counts;")?;
        Ok(())
    }
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl LedgerRepository for Database {
    fn record_commit(&self, record: &CommitRecord) -> std::result::Result<(), LedgerError> {
        self.append(record).map_err(Into::into)
    }

    fn counts(&self) -> std::result::Result<Vec<LabelCount>, LedgerError> {
        self.label_counts().map_err(Into::into)
    }

    fn recent(&self, limit: usize) -> std::result::Result<Vec<CommitRecord>, LedgerError> {
        self.recent_commits(limit).map_err(Into::into)
    }

    fn clear(&self) -> std::result::Result<(), LedgerError> {
        self.clear_all().map_err(Into::into)
    }
}
