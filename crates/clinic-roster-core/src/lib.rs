//! Clinic Roster Core Library
//!
//! Nurse/patient roster with nurse assignment and checkup scheduling.
//!
//! # Architecture
//!
//! ```text
//!   CLI line → Command ──▶ ClinicRoster (facade)
//!                               │
//!        ┌──────────────┬───────┴───────┬──────────────┬──────────────┐
//!        ▼              ▼               ▼              ▼              ▼
//!    Assigner        Editor         Scheduler   RelationshipQuery  RecordCommands
//!   (assign /     (role-transition  (checkup    (nurses of patient, (add, delete,
//!    unassign)        guard)        calendar)    patients of nurse)  list, view)
//!        └──────────────┴───────┬───────┴──────────────┴──────────────┘
//!                               ▼
//!                  Roster (records + active filter)
//!                               │
//!                     save after every mutation
//!                               ▼
//!                 RosterStorage (JSON file | SQLite)
//! ```
//!
//! # Core Principle
//!
//! **A failed command changes nothing.** Every engine validates first and then
//! performs one replace, add or remove.
//!
//! # Modules
//!
//! - [`models`]: Validated field types, `Person`, `NurseAssignments`, `Checkup`
//! - [`roster`]: Ordered record store with the active list filter
//! - [`engine`]: Assignment, edit guard, scheduling, queries, record commands
//! - [`storage`]: JSON and SQLite persistence
//! - [`config`]: Startup configuration
//! - [`clock`]: Injectable source of "now"

pub mod clock;
pub mod config;
pub mod engine;
pub mod models;
pub mod roster;
pub mod sample;
pub mod storage;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{RosterConfig, StorageBackend};
pub use engine::{
    CommandError, CommandOutcome, CommandResult, EditDescriptor, ScheduleAction, TransitionBlock,
};
pub use models::{Checkup, ModelError, NurseAssignments, Person, Role};
pub use roster::{Index, ListFilter, Roster, RosterError};
pub use storage::{JsonFileStorage, RosterStorage, SqliteStorage, StorageError};

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use engine::{Assigner, Editor, RecordCommands, RecordView, RelationshipQuery, Scheduler};
use models::Name;

// =========================================================================
// Main API Object
// =========================================================================

/// The roster together with its clock and optional storage backend.
///
/// Mutating commands take `&mut self`, so commands never interleave.
pub struct ClinicRoster {
    roster: Roster,
    clock: Box<dyn Clock>,
    storage: Option<Box<dyn RosterStorage>>,
}

impl ClinicRoster {
    /// An unsaved roster starting from `roster`.
    pub fn in_memory(roster: Roster, clock: Box<dyn Clock>) -> Self {
        Self {
            roster,
            clock,
            storage: None,
        }
    }

    /// Load from `storage`. When nothing is stored yet, start from the sample
    /// roster if `seed_sample_data` is set, otherwise empty.
    pub fn with_storage(
        storage: Box<dyn RosterStorage>,
        clock: Box<dyn Clock>,
        seed_sample_data: bool,
    ) -> CommandResult<Self> {
        let roster = match storage.load()? {
            Some(persons) => {
                info!(source = %storage.describe(), count = persons.len(), "roster loaded");
                Roster::from_persons(persons).map_err(|e| {
                    StorageError::InvalidRecord(format!("stored roster is inconsistent: {}", e))
                })?
            }
            None if seed_sample_data => {
                warn!(source = %storage.describe(), "no stored roster, starting from sample data");
                Roster::from_persons(sample::sample_persons()?)?
            }
            None => {
                warn!(source = %storage.describe(), "no stored roster, starting empty");
                Roster::new()
            }
        };

        Ok(Self {
            roster,
            clock,
            storage: Some(storage),
        })
    }

    /// Open the storage named by `config` and load from it.
    pub fn open(config: &RosterConfig, clock: Box<dyn Clock>) -> CommandResult<Self> {
        let storage = config.open_storage()?;
        Self::with_storage(storage, clock, config.seed_sample_data())
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Records currently shown, in display order.
    pub fn displayed_persons(&self) -> Vec<&Person> {
        self.roster.filtered_view()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    pub fn add_person(&mut self, person: Person) -> CommandResult<CommandOutcome> {
        let outcome = RecordCommands::new(&mut self.roster, self.clock.as_ref()).add(person)?;
        self.persist(outcome)
    }

    pub fn delete_person(&mut self, index: Index) -> CommandResult<CommandOutcome> {
        let outcome = RecordCommands::new(&mut self.roster, self.clock.as_ref()).delete(index)?;
        self.persist(outcome)
    }

    pub fn edit_person(
        &mut self,
        index: Index,
        descriptor: EditDescriptor,
    ) -> CommandResult<CommandOutcome> {
        let outcome = Editor::new(&mut self.roster, self.clock.as_ref()).edit(index, descriptor)?;
        self.persist(outcome)
    }

    /// Change the active filter. Not persisted.
    pub fn list(&mut self, filter: ListFilter) -> CommandOutcome {
        RecordCommands::new(&mut self.roster, self.clock.as_ref()).list(filter)
    }

    /// Show records whose name contains any of `keywords` as a whole word.
    pub fn find_by_name(&mut self, keywords: Vec<String>) -> CommandOutcome {
        self.list(ListFilter::NameKeywords(keywords))
    }

    pub fn view(&self, index: Index) -> CommandResult<CommandOutcome> {
        RecordView::new(&self.roster).view(index)
    }

    // =========================================================================
    // Assignment Operations
    // =========================================================================

    pub fn assign(&mut self, patient_index: Index, nurse_index: Index) -> CommandResult<CommandOutcome> {
        let outcome = Assigner::new(&mut self.roster).assign(patient_index, nurse_index)?;
        self.persist(outcome)
    }

    pub fn unassign(&mut self, nurse: &Name, patient_index: Index) -> CommandResult<CommandOutcome> {
        let outcome = Assigner::new(&mut self.roster).unassign(nurse, patient_index)?;
        self.persist(outcome)
    }

    pub fn nurses_of_patient(&self, patient_index: Index) -> CommandResult<CommandOutcome> {
        RelationshipQuery::new(&self.roster).nurses_of_patient(patient_index)
    }

    pub fn patients_of_nurse(&self, nurse_index: Index) -> CommandResult<CommandOutcome> {
        RelationshipQuery::new(&self.roster).patients_of_nurse(nurse_index)
    }

    // =========================================================================
    // Scheduling Operations
    // =========================================================================

    pub fn schedule(
        &mut self,
        action: ScheduleAction,
        patient_index: Index,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CommandResult<CommandOutcome> {
        let outcome = Scheduler::new(&mut self.roster, self.clock.as_ref())
            .schedule(action, patient_index, date, time)?;
        self.persist(outcome)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save after a successful mutation. On failure the in-memory change is
    /// kept and the next successful save persists it.
    fn persist(&mut self, outcome: CommandOutcome) -> CommandResult<CommandOutcome> {
        if let Some(storage) = self.storage.as_mut() {
            storage.save(self.roster.all()).inspect_err(|e| {
                warn!(location = %storage.describe(), error = %e, "failed to save roster");
            })?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn clock() -> Box<dyn Clock> {
        let now = NaiveDateTime::parse_from_str("01/06/2025 08:00", "%d/%m/%Y %H:%M").unwrap();
        Box::new(FixedClock(now))
    }

    fn idx(n: usize) -> Index {
        Index::new(n).unwrap()
    }

    #[test]
    fn test_seeds_sample_data_when_nothing_stored() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let roster = ClinicRoster::with_storage(Box::new(storage), clock(), true).unwrap();
        assert_eq!(roster.roster().len(), 6);
    }

    #[test]
    fn test_mutations_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");

        let mut roster =
            ClinicRoster::with_storage(Box::new(JsonFileStorage::new(&path)), clock(), true)
                .unwrap();
        // Roy (patient) is last; Alex (nurse) is first.
        roster.assign(idx(6), idx(1)).unwrap();

        let reopened =
            ClinicRoster::with_storage(Box::new(JsonFileStorage::new(&path)), clock(), true)
                .unwrap();
        let roy = reopened.roster().get(idx(6)).unwrap();
        assert!(roy.assignments().contains(&"Alex Yeoh".parse().unwrap()));
    }

    #[test]
    fn test_failed_command_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        let mut roster =
            ClinicRoster::with_storage(Box::new(JsonFileStorage::new(&path)), clock(), false)
                .unwrap();
        assert!(roster.assign(idx(1), idx(2)).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_find_by_name_then_view_through_shared_reference() {
        let mut roster = ClinicRoster::in_memory(
            Roster::from_persons(sample::sample_persons().unwrap()).unwrap(),
            clock(),
        );
        let outcome = roster.find_by_name(vec!["roy".into()]);
        assert_eq!(outcome.message, "1 persons listed!");

        let shared: &ClinicRoster = &roster;
        assert!(shared
            .view(idx(1))
            .unwrap()
            .message
            .starts_with("Displaying details for: Roy Balakrishnan."));
    }

    #[test]
    fn test_list_then_view_uses_filtered_index() {
        let mut roster = ClinicRoster::in_memory(
            Roster::from_persons(sample::sample_persons().unwrap()).unwrap(),
            clock(),
        );
        roster.list(ListFilter::Role(Role::Patient));
        assert_eq!(roster.displayed_persons().len(), 1);
        assert_eq!(
            roster.view(idx(1)).unwrap().message,
            "Displaying details for: Roy Balakrishnan.\nMedical History for Roy Balakrishnan: [Diabetes]"
        );
    }
}
