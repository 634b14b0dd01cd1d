//! In-memory roster store.
//!
//! Holds records in insertion order together with the active [`ListFilter`].
//! Commands address records by a 1-based [`Index`] into the filtered view and
//! replace them by `local_id`.

mod filter;

pub use filter::*;

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::models::Person;

/// Roster store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("The person index provided is invalid")]
    InvalidIndex(Index),

    #[error("This person already exists in the roster")]
    DuplicateRecord,

    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// A 1-based position in the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Index(usize);

impl Index {
    /// `None` for zero.
    pub fn new(one_based: usize) -> Option<Self> {
        (one_based > 0).then_some(Self(one_based))
    }

    pub fn one_based(&self) -> usize {
        self.0
    }

    pub fn zero_based(&self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered collection of person records plus the active list filter.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    persons: Vec<Person>,
    filter: ListFilter,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded records, rejecting identity duplicates.
    pub fn from_persons(persons: Vec<Person>) -> RosterResult<Self> {
        let mut roster = Self::new();
        for person in persons {
            roster.add(person)?;
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Whether any record is the same person as `person`.
    pub fn contains_same_person(&self, person: &Person) -> bool {
        self.persons.iter().any(|p| p.is_same_person(person))
    }

    /// Append a record.
    pub fn add(&mut self, person: Person) -> RosterResult<()> {
        if self.contains_same_person(&person) {
            return Err(RosterError::DuplicateRecord);
        }
        self.persons.push(person);
        Ok(())
    }

    /// Substitute the record with `local_id`, keeping its position.
    pub fn replace(&mut self, local_id: Uuid, person: Person) -> RosterResult<()> {
        let slot = self
            .persons
            .iter_mut()
            .find(|p| p.local_id() == local_id)
            .ok_or(RosterError::RecordNotFound(local_id))?;
        *slot = person;
        Ok(())
    }

    /// Remove and return the record with `local_id`.
    pub fn remove(&mut self, local_id: Uuid) -> RosterResult<Person> {
        let position = self
            .persons
            .iter()
            .position(|p| p.local_id() == local_id)
            .ok_or(RosterError::RecordNotFound(local_id))?;
        Ok(self.persons.remove(position))
    }

    /// Read-only unfiltered view. Never touches the active filter.
    pub fn all(&self) -> &[Person] {
        &self.persons
    }

    /// Records matching the active filter.
    pub fn filtered_view(&self) -> Vec<&Person> {
        self.filter.apply(&self.persons)
    }

    /// Record at `index` in the filtered view.
    pub fn get(&self, index: Index) -> RosterResult<&Person> {
        self.filtered_view()
            .get(index.zero_based())
            .copied()
            .ok_or(RosterError::InvalidIndex(index))
    }

    pub fn get_by_id(&self, local_id: Uuid) -> Option<&Person> {
        self.persons.iter().find(|p| p.local_id() == local_id)
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
    }
}
