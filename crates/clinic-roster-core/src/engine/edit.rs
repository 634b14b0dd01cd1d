//! Editing records under the role-transition rules.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::models::{
    Address, BloodType, DateOfBirth, Email, MedicalHistory, Name, NextOfKin, Phone, Role, Tag,
};
use crate::roster::{Index, Roster};

use super::{is_nurse_referenced, CommandError, CommandOutcome, CommandResult, TransitionBlock};

/// Replacement values for an edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDescriptor {
    pub name: Option<Name>,
    pub date_of_birth: Option<DateOfBirth>,
    pub phone: Option<Phone>,
    /// `Some(None)` clears the email.
    pub email: Option<Option<Email>>,
    pub address: Option<Address>,
    pub blood_type: Option<BloodType>,
    pub role: Option<Role>,
    pub next_of_kin: Option<NextOfKin>,
    /// Replaces the whole tag set.
    pub tags: Option<BTreeSet<Tag>>,
    /// Replaces the whole medical history.
    pub medical_history: Option<BTreeSet<MedicalHistory>>,
}

impl EditDescriptor {
    pub fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.date_of_birth.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.blood_type.is_some()
            || self.role.is_some()
            || self.next_of_kin.is_some()
            || self.tags.is_some()
            || self.medical_history.is_some()
    }
}

/// Applies edits, refusing role or name changes that would orphan an
/// assignment.
pub struct Editor<'a> {
    roster: &'a mut Roster,
    clock: &'a dyn Clock,
}

impl<'a> Editor<'a> {
    pub fn new(roster: &'a mut Roster, clock: &'a dyn Clock) -> Self {
        Self { roster, clock }
    }

    /// Edit the record at `index`. Nothing changes unless every check passes.
    pub fn edit(&mut self, index: Index, descriptor: EditDescriptor) -> CommandResult<CommandOutcome> {
        if !descriptor.is_any_field_edited() {
            return Err(CommandError::NothingToEdit);
        }

        let current = self.roster.get(index)?.clone();
        if let Some(dob) = descriptor.date_of_birth {
            DateOfBirth::new(dob.date(), self.clock.today())?;
        }

        let new_role = descriptor.role.unwrap_or(current.role());
        let history_after = descriptor
            .medical_history
            .as_ref()
            .unwrap_or(current.medical_history());
        if new_role == Role::Nurse && !history_after.is_empty() {
            debug!(index = %index, "edit rejected: medical history on nurse");
            return Err(CommandError::MedicalHistoryOnNurse);
        }

        let referenced = is_nurse_referenced(self.roster.all(), &current);
        if let Some(role) = descriptor.role {
            if current.is_patient() && !current.assignments().is_empty() && role != Role::Patient {
                return Err(blocked(index, TransitionBlock::PatientHasNurse));
            }
            if current.is_nurse() && role == Role::Patient && referenced {
                return Err(blocked(index, TransitionBlock::NurseHasPatients));
            }
        }
        if let Some(name) = &descriptor.name {
            if name != current.name() && referenced {
                return Err(blocked(index, TransitionBlock::NurseRenameBlocked));
            }
        }

        let mut builder = current.to_builder().role(new_role);
        if let Some(name) = descriptor.name {
            builder = builder.name(name);
        }
        if let Some(dob) = descriptor.date_of_birth {
            builder = builder.date_of_birth(dob);
        }
        if let Some(phone) = descriptor.phone {
            builder = builder.phone(phone);
        }
        if let Some(email) = descriptor.email {
            builder = builder.email(email);
        }
        if let Some(address) = descriptor.address {
            builder = builder.address(address);
        }
        if let Some(blood_type) = descriptor.blood_type {
            builder = builder.blood_type(blood_type);
        }
        if let Some(next_of_kin) = descriptor.next_of_kin {
            builder = builder.next_of_kin(next_of_kin);
        }
        if let Some(tags) = descriptor.tags {
            builder = builder.tags(tags);
        }
        if let Some(history) = descriptor.medical_history {
            builder = builder.medical_history(history);
        }
        let edited = builder.build()?;

        if !current.is_same_person(&edited) && self.roster.contains_same_person(&edited) {
            debug!(index = %index, "edit rejected: duplicate person");
            return Err(CommandError::DuplicatePerson);
        }

        let message = format!("Edited Person: {}", edited);
        self.roster.replace(current.local_id(), edited)?;
        info!(index = %index, "person edited");
        Ok(CommandOutcome::new(message))
    }
}

fn blocked(index: Index, reason: TransitionBlock) -> CommandError {
    debug!(index = %index, ?reason, "edit rejected: blocked transition");
    CommandError::BlockedRoleTransition(reason)
}
