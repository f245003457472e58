//! SQLite save storage: latest snapshot per slot plus a write history.

use crate::{error::GameResult, types::SessionId};
use rusqlite::{params, Connection, OptionalExtension};

use super::SaveStorage;

pub struct SqliteStorage {
    conn:       Connection,
    slot:       String,
    session_id: SessionId,
}

impl SqliteStorage {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str, slot: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Self::with_connection(conn, slot)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory(slot: &str) -> GameResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, slot)
    }

    fn with_connection(conn: Connection, slot: &str) -> GameResult<Self> {
        let storage = Self {
            conn,
            slot:       slot.to_string(),
            session_id: uuid::Uuid::new_v4().to_string(),
        };
        storage.migrate()?;
        Ok(storage)
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_saves.sql"))?;
        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Number of writes ever made to this slot, across sessions.
    pub fn history_count(&self) -> GameResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM save_history WHERE slot = ?1",
            params![self.slot],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of distinct sessions that have written to this slot.
    pub fn session_count(&self) -> GameResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT session_id) FROM save_history WHERE slot = ?1",
            params![self.slot],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SaveStorage for SqliteStorage {
    fn describe(&self) -> String {
        format!("sqlite slot '{}'", self.slot)
    }

    fn read(&self) -> GameResult<Option<Vec<u8>>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM save_slot WHERE slot = ?1",
                params![self.slot],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&mut self, bytes: &[u8]) -> GameResult<()> {
        let saved_at = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO save_slot (slot, payload, session_id, saved_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                session_id = excluded.session_id,
                saved_at = excluded.saved_at",
            params![self.slot, bytes, self.session_id, saved_at],
        )?;
        tx.execute(
            "INSERT INTO save_history (slot, session_id, byte_len, saved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.slot, self.session_id, bytes.len() as i64, saved_at],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn clear(&mut self) -> GameResult<()> {
        self.conn
            .execute("DELETE FROM save_slot WHERE slot = ?1", params![self.slot])?;
        Ok(())
    }
}
