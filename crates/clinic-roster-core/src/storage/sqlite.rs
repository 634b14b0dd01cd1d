//! SQLite snapshot backend.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::models::Person;

use super::{RosterStorage, StorageResult, StoredPerson};

/// Snapshot schema. `payload` holds the same per-person JSON as the file
/// backend.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Roster snapshot
-- ============================================================================

CREATE TABLE IF NOT EXISTS persons (
    position INTEGER PRIMARY KEY,
    local_id TEXT NOT NULL UNIQUE,
    payload TEXT NOT NULL                         -- JSON StoredPerson
);

-- Single row, present once the roster has been saved at least once
CREATE TABLE IF NOT EXISTS snapshot (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    saved_at TEXT NOT NULL DEFAULT (datetime('now')),
    person_count INTEGER NOT NULL
);
"#;

/// Stores the roster as a snapshot in a SQLite database.
pub struct SqliteStorage {
    conn: Connection,
    label: String,
}

impl SqliteStorage {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let storage = Self {
            conn,
            label: format!("sqlite:{}", path.as_ref().display()),
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn,
            label: "sqlite::memory:".to_string(),
        };
        storage.initialize()?;
        Ok(storage)
    }

    fn initialize(&self) -> StorageResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for inspection in tests and tools).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl RosterStorage for SqliteStorage {
    fn load(&self) -> StorageResult<Option<Vec<Person>>> {
        let saved: Option<i64> = self
            .conn
            .query_row("SELECT person_count FROM snapshot WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        if saved.is_none() {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM persons ORDER BY position")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let persons = payloads
            .iter()
            .map(|payload| {
                let stored: StoredPerson = serde_json::from_str(payload)?;
                Person::try_from(stored)
            })
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(Some(persons))
    }

    fn save(&mut self, persons: &[Person]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM persons", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO persons (position, local_id, payload) VALUES (?1, ?2, ?3)",
            )?;
            for (position, person) in persons.iter().enumerate() {
                let payload = serde_json::to_string(&StoredPerson::from(person))?;
                insert.execute(params![
                    position as i64,
                    person.local_id().to_string(),
                    payload
                ])?;
            }
        }
        tx.execute(
            r#"
            INSERT INTO snapshot (id, saved_at, person_count) VALUES (1, datetime('now'), ?1)
            ON CONFLICT(id) DO UPDATE SET
                saved_at = excluded.saved_at,
                person_count = excluded.person_count
            "#,
            [persons.len() as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
