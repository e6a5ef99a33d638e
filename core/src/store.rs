//! Save persistence: where encoded saves and the event journal go.
//!
//! RULE: Only store.rs talks to the database or the filesystem.
//! The engine sees a `SaveBackend` and never touches SQL or paths.

use crate::{
    error::SimResult,
    event::EventLogEntry,
    types::Day,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

/// Byte sink/source behind the save codec.
pub trait SaveBackend: Send {
    fn write_save(&mut self, text: &str) -> SimResult<()>;

    /// `Ok(None)` when nothing has been saved yet.
    fn read_save(&mut self) -> SimResult<Option<String>>;

    /// Journal one event. Backends without a journal ignore it.
    fn record_event(&mut self, _entry: &EventLogEntry) -> SimResult<()> {
        Ok(())
    }
}

pub const DEFAULT_SLOT: &str = "main";

// ── SQLite ─────────────────────────────────────────────────────────

pub struct SaveStore {
    conn: Connection,
    slot: String,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            slot: DEFAULT_SLOT.to_string(),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            slot: DEFAULT_SLOT.to_string(),
        })
    }

    /// Read and write a different slot than "main".
    pub fn with_slot(mut self, slot: &str) -> Self {
        self.slot = slot.to_string();
        self
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Save slots ─────────────────────────────────────────────

    pub fn put_slot(&self, slot: &str, payload: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (slot, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at",
            params![slot, payload, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_slot(&self, slot: &str) -> SimResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM save_slot WHERE slot = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    /// RFC 3339 timestamp of the last write to `slot`.
    pub fn saved_at(&self, slot: &str) -> SimResult<Option<String>> {
        let at = self
            .conn
            .query_row(
                "SELECT saved_at FROM save_slot WHERE slot = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?;
        Ok(at)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, day, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.day as i64,
                entry.event_type,
                entry.payload,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_day(&self, run_id: &str, day: Day) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, day, event_type, payload
             FROM event_log WHERE run_id = ?1 AND day = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id, day as i64], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    day:        row.get::<_, i64>(2)? as Day,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of journalled events for this run (for tests and summaries).
    pub fn event_count(&self, run_id: &str) -> SimResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SaveBackend for SaveStore {
    fn write_save(&mut self, text: &str) -> SimResult<()> {
        self.put_slot(&self.slot, text)
    }

    fn read_save(&mut self) -> SimResult<Option<String>> {
        self.get_slot(&self.slot)
    }

    fn record_event(&mut self, entry: &EventLogEntry) -> SimResult<()> {
        self.append_event(entry)
    }
}

// ── Plain file ─────────────────────────────────────────────────────

/// A single text file, e.g. `save.txt`.
pub struct FileSave {
    path: PathBuf,
}

impl FileSave {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveBackend for FileSave {
    fn write_save(&mut self, text: &str) -> SimResult<()> {
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    fn read_save(&mut self) -> SimResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
