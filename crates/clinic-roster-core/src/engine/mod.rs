//! Command engines that keep assignments and checkups consistent.
//!
//! Every engine validates against the current roster first and only then
//! performs a single replace (or add/remove), so a failed command leaves the
//! roster unchanged.

mod assign;
mod edit;
mod query;
mod records;
mod schedule;

pub use assign::*;
pub use edit::*;
pub use query::*;
pub use records::*;
pub use schedule::*;

use std::fmt;

use thiserror::Error;

use crate::models::{Checkup, ModelError, Person};
use crate::roster::{Index, RosterError};
use crate::storage::StorageError;

/// Why an edit that changes role or name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionBlock {
    /// Patient -> Nurse while nurses are still assigned.
    PatientHasNurse,
    /// Nurse -> Patient while patients still reference the nurse.
    NurseHasPatients,
    /// Renaming a nurse that patients still reference.
    NurseRenameBlocked,
}

impl fmt::Display for TransitionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransitionBlock::PatientHasNurse => {
                "Unable to change appointment to a nurse, as this patient is assigned to a nurse.\n\
                 Please remove all assigned nurses before changing appointment to nurse."
            }
            TransitionBlock::NurseHasPatients => {
                "Unable to change appointment to a patient, as this nurse is assigned to a patient.\n\
                 Please remove all assigned patients to this nurse before changing appointment to patient."
            }
            TransitionBlock::NurseRenameBlocked => {
                "Unable to change name, as this nurse is assigned to a patient.\n\
                 Please remove all assigned patients to this nurse before changing name."
            }
        })
    }
}

/// Command failures. None of them leaves a partial change behind.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Model(ModelError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("The person at index {0} is not a patient.")]
    InvalidPatient(Index),

    #[error("The person at index {0} is not a nurse.")]
    InvalidNurse(Index),

    #[error("This patient already has {max} assigned nurses!")]
    TooManyNurses { max: usize },

    #[error("Nurse {nurse} is already assigned to patient {patient}.")]
    NurseAlreadyAssigned { nurse: String, patient: String },

    #[error("Nurse {nurse} is not assigned to patient {patient}.{}", suggestion_text(.suggestion))]
    InvalidNurseAssignment {
        nurse: String,
        patient: String,
        suggestion: Option<String>,
    },

    #[error("This person already exists in the roster")]
    DuplicatePerson,

    #[error(
        "Medical history should not be added to a nurse.\nDelete medical history in order to \
         change to nurse appointment. (e.g. edit 1 mh/ to remove medical history)."
    )]
    MedicalHistoryOnNurse,

    #[error("{0}")]
    BlockedRoleTransition(TransitionBlock),

    #[error("Checkup must be scheduled between 9:00 AM and 5:00 PM")]
    OutsideBusinessHours,

    #[error("Checkup cannot be scheduled in the past")]
    PastDate,

    #[error("A checkup is already scheduled at this datetime.")]
    DuplicateCheckup,

    #[error("There's a checkup scheduled on {0}! Please choose another time / date")]
    TooCloseCheckup(Checkup),

    #[error("Appointment does not exist")]
    CheckupNotFound,

    #[error("No nurse assigned to the patient at index {0}.")]
    NoNurseAssigned(Index),

    #[error("No patient assigned to the nurse at index {0}.")]
    NoPatientAssigned(Index),

    #[error("At least one field to edit must be provided.")]
    NothingToEdit,

    #[error(
        "Unable to delete nurse {0}, as this nurse is assigned to a patient.\n\
         Please remove all assigned patients to this nurse before deleting."
    )]
    BlockedDeletion(String),
}

fn suggestion_text(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|name| format!(" Did you mean {}?", name))
        .unwrap_or_default()
}

/// Model violations that belong to the command taxonomy are lifted into it.
impl From<ModelError> for CommandError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::TooManyNurses { max } => CommandError::TooManyNurses { max },
            ModelError::MedicalHistoryOnNurse => CommandError::MedicalHistoryOnNurse,
            ModelError::OutsideBusinessHours => CommandError::OutsideBusinessHours,
            ModelError::PastDate => CommandError::PastDate,
            other => CommandError::Model(other),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Feedback for a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub message: String,
    /// Soft warning shown alongside a success.
    pub warning: Option<String>,
}

impl CommandOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

/// Whether any patient in `persons` references the nurse `nurse`.
pub(crate) fn is_nurse_referenced(persons: &[Person], nurse: &Person) -> bool {
    nurse.is_nurse() && persons.iter().any(|p| p.is_assigned_to(nurse.name()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::clock::FixedClock;
    use crate::models::{BloodType, Person, Role};
    use crate::roster::{Index, Roster};

    pub fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
    }

    pub fn person(name: &str, phone: &str, role: Role) -> Person {
        Person::builder(
            name.parse().unwrap(),
            "01/01/1990".parse().unwrap(),
            phone.parse().unwrap(),
            "Blk 30 Geylang Street 29".parse().unwrap(),
            BloodType::BPositive,
            role,
        )
        .build()
        .unwrap()
    }

    /// Alice (patient), Bob (nurse), Carol (nurse), Dan (patient).
    pub fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.add(person("Alice", "91234567", Role::Patient)).unwrap();
        roster.add(person("Bob", "98765432", Role::Nurse)).unwrap();
        roster.add(person("Carol", "87654321", Role::Nurse)).unwrap();
        roster.add(person("Dan", "81112222", Role::Patient)).unwrap();
        roster
    }

    pub fn idx(n: usize) -> Index {
        Index::new(n).unwrap()
    }
}
