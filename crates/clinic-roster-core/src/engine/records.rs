//! Record lifecycle commands: add, delete, list and view.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::models::{DateOfBirth, Person};
use crate::roster::{Index, ListFilter, Roster};

use super::{is_nurse_referenced, CommandError, CommandOutcome, CommandResult};

pub struct RecordCommands<'a> {
    roster: &'a mut Roster,
    clock: &'a dyn Clock,
}

impl<'a> RecordCommands<'a> {
    pub fn new(roster: &'a mut Roster, clock: &'a dyn Clock) -> Self {
        Self { roster, clock }
    }

    /// Add a new record unless the same person already exists.
    pub fn add(&mut self, person: Person) -> CommandResult<CommandOutcome> {
        DateOfBirth::new(person.date_of_birth().date(), self.clock.today())?;

        let message = format!("New person added: {}", person);
        let name = person.name().clone();
        self.roster
            .add(person)
            .inspect_err(|e| debug!(error = %e, "add rejected"))?;

        info!(%name, "person added");
        Ok(CommandOutcome::new(message))
    }

    /// Delete the record at `index`. A nurse still assigned to a patient is
    /// kept.
    pub fn delete(&mut self, index: Index) -> CommandResult<CommandOutcome> {
        let target = self.roster.get(index)?;
        if is_nurse_referenced(self.roster.all(), target) {
            debug!(%index, "delete rejected: nurse still assigned");
            return Err(CommandError::BlockedDeletion(target.name().to_string()));
        }

        let local_id = target.local_id();
        let removed = self.roster.remove(local_id)?;
        info!(name = %removed.name(), "person deleted");
        Ok(CommandOutcome::new(format!("Deleted Person: {}", removed)))
    }

    /// Switch the active filter.
    pub fn list(&mut self, filter: ListFilter) -> CommandOutcome {
        let message = match &filter {
            ListFilter::All => "Listed all persons (Nurses and Patients)".to_string(),
            ListFilter::Role(role) => format!("Listed all persons with appointment: {}", role),
            ListFilter::WithCheckups => "Listed all persons with checkups".to_string(),
            ListFilter::NameKeywords(_) => {
                format!("{} persons listed!", filter.apply(self.roster.all()).len())
            }
        };
        self.roster.set_filter(filter);
        CommandOutcome::new(message)
    }
}

/// Read-only record lookups.
pub struct RecordView<'a> {
    roster: &'a Roster,
}

impl<'a> RecordView<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// Describe the record at `index`; patients also get their history.
    pub fn view(&self, index: Index) -> CommandResult<CommandOutcome> {
        let person = self.roster.get(index)?;
        let mut message = format!("Displaying details for: {}.", person.name());
        if person.is_patient() {
            message.push('\n');
            if person.medical_history().is_empty() {
                message.push_str("No medical history available.");
            } else {
                let entries: String = person
                    .medical_history()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                message.push_str(&format!("Medical History for {}: {}", person.name(), entries));
            }
        }
        Ok(CommandOutcome::new(message))
    }
}
