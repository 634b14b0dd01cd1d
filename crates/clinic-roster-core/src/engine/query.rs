//! Read-only nurse/patient relationship lookups.

use tracing::debug;

use crate::roster::{Index, Roster};

use super::{CommandError, CommandOutcome, CommandResult};

/// Answers "who is assigned to whom" without mutating the roster.
pub struct RelationshipQuery<'a> {
    roster: &'a Roster,
}

impl<'a> RelationshipQuery<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// Nurses assigned to the patient at `patient_index`.
    pub fn nurses_of_patient(&self, patient_index: Index) -> CommandResult<CommandOutcome> {
        let patient = self.roster.get(patient_index)?;
        if !patient.is_patient() {
            return Err(CommandError::InvalidPatient(patient_index));
        }

        let nurses: Vec<&str> = patient.assignments().names().map(|n| n.as_str()).collect();
        if nurses.is_empty() {
            debug!(index = %patient_index, "no nurse assigned");
            return Err(CommandError::NoNurseAssigned(patient_index));
        }
        Ok(CommandOutcome::new(format!(
            "Nurse(s) assigned to patient {}: {}.",
            patient.name(),
            nurses.join(", ")
        )))
    }

    /// Patients referencing the nurse at `nurse_index`.
    ///
    /// The nurse is resolved in the filtered view; the scan runs over the
    /// unfiltered view, so the active filter is left as it was.
    pub fn patients_of_nurse(&self, nurse_index: Index) -> CommandResult<CommandOutcome> {
        let nurse = self.roster.get(nurse_index)?;
        if !nurse.is_nurse() {
            return Err(CommandError::InvalidNurse(nurse_index));
        }

        let patients: Vec<&str> = self
            .roster
            .all()
            .iter()
            .filter(|p| p.is_assigned_to(nurse.name()))
            .map(|p| p.name().as_str())
            .collect();
        if patients.is_empty() {
            debug!(index = %nurse_index, "no patient assigned");
            return Err(CommandError::NoPatientAssigned(nurse_index));
        }
        Ok(CommandOutcome::new(format!(
            "Patient(s) assigned to nurse {}: {}.",
            nurse.name(),
            patients.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{idx, roster};
    use crate::engine::Assigner;
    use crate::models::Role;
    use crate::roster::ListFilter;

    #[test]
    fn test_nurses_of_patient() {
        let mut roster = roster();
        let query = RelationshipQuery::new(&roster);
        assert!(matches!(
            query.nurses_of_patient(idx(1)),
            Err(CommandError::NoNurseAssigned(_))
        ));

        let mut assigner = Assigner::new(&mut roster);
        assigner.assign(idx(1), idx(2)).unwrap();
        assigner.assign(idx(1), idx(3)).unwrap();
        let outcome = RelationshipQuery::new(&roster).nurses_of_patient(idx(1)).unwrap();
        assert_eq!(outcome.message, "Nurse(s) assigned to patient Alice: Bob, Carol.");
    }

    #[test]
    fn test_patients_of_nurse_keeps_filter() {
        let mut roster = roster();
        let mut assigner = Assigner::new(&mut roster);
        assigner.assign(idx(1), idx(2)).unwrap();
        assigner.assign(idx(4), idx(2)).unwrap();

        roster.set_filter(ListFilter::Role(Role::Nurse));
        let query = RelationshipQuery::new(&roster);
        let outcome = query.patients_of_nurse(idx(1)).unwrap();
        assert_eq!(outcome.message, "Patient(s) assigned to nurse Bob: Alice, Dan.");

        assert!(matches!(
            query.patients_of_nurse(idx(2)),
            Err(CommandError::NoPatientAssigned(_))
        ));
        assert_eq!(roster.filter(), &ListFilter::Role(Role::Nurse));
    }

    #[test]
    fn test_role_checks() {
        let roster = roster();
        let query = RelationshipQuery::new(&roster);
        assert!(matches!(
            query.patients_of_nurse(idx(1)),
            Err(CommandError::InvalidNurse(_))
        ));
        assert!(matches!(
            query.nurses_of_patient(idx(2)),
            Err(CommandError::InvalidPatient(_))
        ));
    }
}
