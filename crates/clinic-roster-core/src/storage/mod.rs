//! Persistence for the roster.
//!
//! The roster is loaded once at startup and saved as a whole after every
//! successful mutating command. Two backends share one per-person document
//! shape ([`StoredPerson`]): a JSON file and a SQLite snapshot.

mod json;
mod record;
mod sqlite;

pub use json::*;
pub use record::*;
pub use sqlite::*;

use thiserror::Error;

use crate::models::Person;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A place the roster can be loaded from and saved to.
pub trait RosterStorage {
    /// Stored records in roster order, or `None` when nothing has been saved
    /// yet.
    fn load(&self) -> StorageResult<Option<Vec<Person>>>;

    /// Replace the stored roster with `persons`.
    fn save(&mut self, persons: &[Person]) -> StorageResult<()>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}
