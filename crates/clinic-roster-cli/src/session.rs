//! One interactive session: parses lines and runs them against the roster.

use std::fmt::Write as _;

use tracing::debug;

use clinic_roster_core::{ClinicRoster, CommandOutcome, CommandResult};

use crate::parser::{parse_command, Command, HELP_MESSAGE};

/// Result of handling one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show; the session goes on.
    Show(String),
    /// The user asked to leave.
    Exit(String),
}

pub struct Session {
    clinic: ClinicRoster,
}

impl Session {
    pub fn new(clinic: ClinicRoster) -> Self {
        Self { clinic }
    }

    pub fn clinic(&self) -> &ClinicRoster {
        &self.clinic
    }

    /// Parse and run one line. Parse and command errors become reply text.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::Show(String::new());
        }
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "unparseable input");
                return Reply::Show(e.to_string());
            }
        };

        match command {
            Command::Help => Reply::Show(HELP_MESSAGE.to_string()),
            Command::Exit => Reply::Exit("Exiting roster as requested ...".to_string()),
            Command::List(filter) => {
                let outcome = self.clinic.list(filter);
                Reply::Show(format!("{}\n{}", outcome.message, self.render_list()))
            }
            Command::Find(keywords) => {
                let outcome = self.clinic.find_by_name(keywords);
                Reply::Show(format!("{}\n{}", outcome.message, self.render_list()))
            }
            other => Reply::Show(render(self.run(other))),
        }
    }

    fn run(&mut self, command: Command) -> CommandResult<CommandOutcome> {
        match command {
            Command::Add(person) => self.clinic.add_person(person),
            Command::Edit(index, descriptor) => self.clinic.edit_person(index, descriptor),
            Command::Delete(index) => self.clinic.delete_person(index),
            Command::View(index) => self.clinic.view(index),
            Command::Assign { patient, nurse } => self.clinic.assign(patient, nurse),
            Command::Unassign { nurse, patient } => self.clinic.unassign(&nurse, patient),
            Command::Schedule {
                action,
                patient,
                date,
                time,
            } => self.clinic.schedule(action, patient, date, time),
            Command::FindNurse(index) => self.clinic.nurses_of_patient(index),
            Command::FindPatient(index) => self.clinic.patients_of_nurse(index),
            Command::List(filter) => Ok(self.clinic.list(filter)),
            Command::Find(keywords) => Ok(self.clinic.find_by_name(keywords)),
            Command::Help => Ok(CommandOutcome::new(HELP_MESSAGE.to_string())),
            Command::Exit => Ok(CommandOutcome::new(String::new())),
        }
    }

    /// The displayed records, numbered from 1.
    pub fn render_list(&self) -> String {
        let persons = self.clinic.displayed_persons();
        if persons.is_empty() {
            return "(no persons to show)".to_string();
        }
        let mut out = String::new();
        for (i, person) in persons.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, person);
        }
        out.trim_end().to_string()
    }
}

fn render(result: CommandResult<CommandOutcome>) -> String {
    match result {
        Ok(CommandOutcome {
            message,
            warning: Some(warning),
        }) => format!("{}\n{}", message, warning),
        Ok(outcome) => outcome.message,
        Err(e) => e.to_string(),
    }
}
