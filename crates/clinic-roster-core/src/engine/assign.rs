//! Assigning nurses to patients and removing those assignments.

use strsim::jaro_winkler;
use tracing::{debug, info};

use crate::models::{ModelError, Name, NurseAssignments};
use crate::roster::{Index, Roster};

use super::{CommandError, CommandOutcome, CommandResult};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Applies assign / assign-delete commands to a roster.
pub struct Assigner<'a> {
    roster: &'a mut Roster,
}

impl<'a> Assigner<'a> {
    pub fn new(roster: &'a mut Roster) -> Self {
        Self { roster }
    }

    /// Assign the nurse at `nurse_index` to the patient at `patient_index`.
    ///
    /// Only the patient record is replaced.
    pub fn assign(&mut self, patient_index: Index, nurse_index: Index) -> CommandResult<CommandOutcome> {
        let patient = self.roster.get(patient_index)?.clone();
        let nurse = self.roster.get(nurse_index)?;

        if !patient.is_patient() {
            debug!(index = %patient_index, "assign rejected: not a patient");
            return Err(CommandError::InvalidPatient(patient_index));
        }
        if !nurse.is_nurse() {
            debug!(index = %nurse_index, "assign rejected: not a nurse");
            return Err(CommandError::InvalidNurse(nurse_index));
        }
        let nurse_name = nurse.name().clone();

        let assignments = patient
            .assignments()
            .with_nurse(nurse_name.clone())
            .map_err(|e| match e {
                ModelError::NurseAlreadyAssigned(_) => CommandError::NurseAlreadyAssigned {
                    nurse: nurse_name.to_string(),
                    patient: patient.name().to_string(),
                },
                other => other.into(),
            })
            .inspect_err(|e| debug!(error = %e, "assign rejected"))?;

        let updated = patient.with_assignments(assignments)?;
        self.roster.replace(patient.local_id(), updated)?;

        info!(nurse = %nurse_name, patient = %patient.name(), "nurse assigned");
        Ok(CommandOutcome::new(format!(
            "Assigned nurse {} to patient {}.",
            nurse_name,
            patient.name()
        )))
    }

    /// Remove the assignment of `nurse` from the patient at `patient_index`.
    pub fn unassign(&mut self, nurse: &Name, patient_index: Index) -> CommandResult<CommandOutcome> {
        let patient = self.roster.get(patient_index)?.clone();
        if !patient.is_patient() {
            debug!(index = %patient_index, "assign delete rejected: not a patient");
            return Err(CommandError::InvalidPatient(patient_index));
        }

        let display_name = nurse.as_str().to_uppercase();
        let Some(assignments) = patient.assignments().without_nurse(nurse.as_str()) else {
            debug!(nurse = %nurse, patient = %patient.name(), "assign delete rejected: not assigned");
            return Err(CommandError::InvalidNurseAssignment {
                nurse: display_name,
                patient: patient.name().to_string(),
                suggestion: closest_assigned(patient.assignments(), nurse),
            });
        };

        let updated = patient.with_assignments(assignments)?;
        self.roster.replace(patient.local_id(), updated)?;

        info!(nurse = %nurse, patient = %patient.name(), "nurse unassigned");
        Ok(CommandOutcome::new(format!(
            "Removed assigned nurse {} from patient {}.",
            display_name,
            patient.name()
        )))
    }
}

/// The assigned nurse whose name is most similar to `nurse`, if close enough.
fn closest_assigned(assignments: &NurseAssignments, nurse: &Name) -> Option<String> {
    let query = nurse.as_str().to_lowercase();
    assignments
        .names()
        .map(|name| (jaro_winkler(&name.as_str().to_lowercase(), &query), name))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, name)| name.to_string())
}
