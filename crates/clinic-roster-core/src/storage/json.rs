//! JSON file backend.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::models::Person;

use super::{RosterStorage, StorageResult, StoredPerson, StoredRoster};

/// Stores the roster as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterStorage for JsonFileStorage {
    fn load(&self) -> StorageResult<Option<Vec<Person>>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no roster file yet");
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)?;
        let document: StoredRoster = serde_json::from_str(&text)?;
        let persons = document
            .persons
            .into_iter()
            .map(Person::try_from)
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(Some(persons))
    }

    /// Writes a sibling temp file and renames it over the roster file, so an
    /// interrupted save leaves the previous roster intact.
    fn save(&mut self, persons: &[Person]) -> StorageResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let document = StoredRoster {
            persons: persons.iter().map(StoredPerson::from).collect(),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, &document)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_persons;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("roster.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("data").join("roster.json"));
        let persons = sample_persons().unwrap();

        storage.save(&persons).unwrap();
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, persons);

        let text = fs::read_to_string(storage.path()).unwrap();
        assert!(text.contains("\"dateOfBirth\""));
        assert!(text.contains("\"medicalHistory\""));
    }

    #[test]
    fn test_save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        let mut storage = JsonFileStorage::new(&path);
        let persons = sample_persons().unwrap();

        storage.save(&persons).unwrap();
        storage.save(&persons[..2]).unwrap();

        assert_eq!(storage.load().unwrap().unwrap(), persons[..2].to_vec());
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStorage::new(&path).load().is_err());
    }
}
