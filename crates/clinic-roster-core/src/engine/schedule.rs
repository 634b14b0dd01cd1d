//! Scheduling and cancelling patient checkups.

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::models::{Checkup, Person};
use crate::roster::{Index, Roster};

use super::{CommandError, CommandOutcome, CommandResult};

/// Reminder attached to a checkup created for a patient with no nurse.
pub const NO_NURSE_WARNING: &str =
    "Check up has been created for a patient without a nurse, REMEMBER to assign a nurse promptly after this!";

/// What a schedule command does with the given slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    Add,
    Delete,
}

/// Maintains each patient's checkup calendar.
pub struct Scheduler<'a> {
    roster: &'a mut Roster,
    clock: &'a dyn Clock,
}

impl<'a> Scheduler<'a> {
    pub fn new(roster: &'a mut Roster, clock: &'a dyn Clock) -> Self {
        Self { roster, clock }
    }

    pub fn schedule(
        &mut self,
        action: ScheduleAction,
        patient_index: Index,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CommandResult<CommandOutcome> {
        match action {
            ScheduleAction::Add => self.add(patient_index, date, time),
            ScheduleAction::Delete => self.delete(patient_index, date, time),
        }
    }

    /// Add a checkup: business hours, not past, not a duplicate, and at least
    /// 30 minutes from every other checkup of the patient.
    pub fn add(&mut self, patient_index: Index, date: NaiveDate, time: NaiveTime) -> CommandResult<CommandOutcome> {
        let patient = self.patient(patient_index)?;
        let checkup = Checkup::schedule(date, time, self.clock.now())
            .inspect_err(|e| debug!(error = %e, "schedule rejected"))?;

        if patient.checkups().contains(&checkup) {
            debug!(%checkup, "schedule rejected: duplicate");
            return Err(CommandError::DuplicateCheckup);
        }
        if let Some(clash) = patient.checkups().iter().find(|c| c.is_too_close_to(&checkup)) {
            debug!(%checkup, %clash, "schedule rejected: too close");
            return Err(CommandError::TooCloseCheckup(*clash));
        }

        let mut checkups = patient.checkups().clone();
        checkups.insert(checkup);
        self.roster
            .replace(patient.local_id(), patient.with_checkups(checkups))?;

        info!(patient = %patient.name(), %checkup, "checkup created");
        let outcome = CommandOutcome::new(format!(
            "Appointment for Patient {} has been successfully created on {} at {}",
            patient.name(),
            checkup.date_string(),
            checkup.time_string()
        ));
        if patient.assignments().is_empty() {
            return Ok(outcome.with_warning(NO_NURSE_WARNING));
        }
        Ok(outcome)
    }

    /// Remove the checkup at exactly `date` `time`.
    pub fn delete(&mut self, patient_index: Index, date: NaiveDate, time: NaiveTime) -> CommandResult<CommandOutcome> {
        let patient = self.patient(patient_index)?;
        let checkup = Checkup::at(date.and_time(time));

        let mut checkups = patient.checkups().clone();
        if !checkups.remove(&checkup) {
            debug!(%checkup, "schedule delete rejected: no such checkup");
            return Err(CommandError::CheckupNotFound);
        }
        self.roster
            .replace(patient.local_id(), patient.with_checkups(checkups))?;

        info!(patient = %patient.name(), %checkup, "checkup deleted");
        Ok(CommandOutcome::new(format!(
            "Appointment for Patient {} has been successfully deleted from {} at {}",
            patient.name(),
            checkup.date_string(),
            checkup.time_string()
        )))
    }

    fn patient(&self, index: Index) -> CommandResult<Person> {
        let person = self.roster.get(index)?;
        if !person.is_patient() {
            debug!(%index, "schedule rejected: not a patient");
            return Err(CommandError::InvalidPatient(index));
        }
        Ok(person.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{clock, idx, roster};
    use crate::engine::Assigner;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%d/%m/%Y").unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_add_checkup_warns_without_nurse() {
        let mut roster = roster();
        let clock = clock();
        let outcome = Scheduler::new(&mut roster, &clock)
            .add(idx(1), date("24/12/2025"), time(10, 0))
            .unwrap();
        assert_eq!(
            outcome.message,
            "Appointment for Patient Alice has been successfully created on 24/12/2025 at 10:00"
        );
        assert_eq!(outcome.warning.as_deref(), Some(NO_NURSE_WARNING));
        assert_eq!(roster.get(idx(1)).unwrap().checkups().len(), 1);
    }

    #[test]
    fn test_add_checkup_no_warning_with_nurse() {
        let mut roster = roster();
        Assigner::new(&mut roster).assign(idx(1), idx(2)).unwrap();
        let clock = clock();
        let outcome = Scheduler::new(&mut roster, &clock)
            .add(idx(1), date("24/12/2025"), time(10, 0))
            .unwrap();
        assert_eq!(outcome.warning, None);
    }

    #[test]
    fn test_too_close_and_duplicate() {
        let mut roster = roster();
        let clock = clock();
        let mut scheduler = Scheduler::new(&mut roster, &clock);
        scheduler.add(idx(1), date("24/12/2025"), time(10, 0)).unwrap();

        let err = scheduler
            .add(idx(1), date("24/12/2025"), time(10, 15))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "There's a checkup scheduled on 24/12/2025 10:00! Please choose another time / date"
        );
        assert!(matches!(
            scheduler.add(idx(1), date("24/12/2025"), time(10, 0)),
            Err(CommandError::DuplicateCheckup)
        ));
        scheduler.add(idx(1), date("24/12/2025"), time(10, 30)).unwrap();
        assert_eq!(roster.get(idx(1)).unwrap().checkups().len(), 2);
    }

    #[test]
    fn test_add_rejects_past_and_out_of_hours() {
        let mut roster = roster();
        let clock = clock();
        let mut scheduler = Scheduler::new(&mut roster, &clock);
        assert!(matches!(
            scheduler.add(idx(1), date("01/01/2020"), time(10, 0)),
            Err(CommandError::PastDate)
        ));
        assert!(matches!(
            scheduler.add(idx(1), date("24/12/2025"), time(18, 0)),
            Err(CommandError::OutsideBusinessHours)
        ));
        assert!(matches!(
            scheduler.add(idx(2), date("24/12/2025"), time(10, 0)),
            Err(CommandError::InvalidPatient(_))
        ));
    }

    #[test]
    fn test_delete_checkup() {
        let mut roster = roster();
        let clock = clock();
        let mut scheduler = Scheduler::new(&mut roster, &clock);
        scheduler.add(idx(1), date("24/12/2025"), time(10, 0)).unwrap();

        assert!(matches!(
            scheduler.schedule(ScheduleAction::Delete, idx(1), date("24/12/2025"), time(11, 0)),
            Err(CommandError::CheckupNotFound)
        ));
        let outcome = scheduler
            .schedule(ScheduleAction::Delete, idx(1), date("24/12/2025"), time(10, 0))
            .unwrap();
        assert_eq!(
            outcome.message,
            "Appointment for Patient Alice has been successfully deleted from 24/12/2025 at 10:00"
        );
        assert!(roster.get(idx(1)).unwrap().checkups().is_empty());
    }
}
