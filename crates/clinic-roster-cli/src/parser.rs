//! Command-line grammar.
//!
//! Turns one input line into a typed [`Command`]. Field values are validated
//! here through the model `FromStr` impls; rules that need the roster or the
//! clock (duplicates, future dates of birth, slot checks) are left to the
//! engines.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use clinic_roster_core::models::{
    Address, BloodType, Checkup, DateOfBirth, Email, MedicalHistory, ModelError, Name, NextOfKin,
    Person, Phone, Role, Tag,
};
use clinic_roster_core::{EditDescriptor, Index, ListFilter, ScheduleAction};

pub const ADD_USAGE: &str = "add: Adds a person to the roster. \
    Parameters: n/NAME d/DATE_OF_BIRTH p/PHONE a/ADDRESS b/BLOOD_TYPE ap/APPOINTMENT \
    [e/EMAIL] [nok/NAME PHONE] [t/TAG]... [mh/MEDICAL_HISTORY]...";

pub const EDIT_USAGE: &str = "edit: Edits the person identified by the index in the displayed list. \
    Parameters: INDEX [n/NAME] [d/DATE_OF_BIRTH] [p/PHONE] [e/EMAIL] [a/ADDRESS] [b/BLOOD_TYPE] \
    [ap/APPOINTMENT] [nok/NAME PHONE] [t/TAG]... [mh/MEDICAL_HISTORY]...";

pub const DELETE_USAGE: &str = "delete: Deletes the person identified by the index. Parameters: INDEX";

pub const VIEW_USAGE: &str = "view: Shows details of the person identified by the index. Parameters: INDEX";

pub const ASSIGN_USAGE: &str = "assign: Assigns a nurse to a patient. \
    Parameters: PATIENT_INDEX NURSE_INDEX, or: delete NURSE_NAME PATIENT_INDEX";

pub const SCHEDULE_USAGE: &str = "schedule: Adds or deletes a checkup. \
    Parameters: add|delete for patient PATIENT_INDEX DD/MM/YYYY HHmm";

pub const FIND_USAGE: &str = "find: Shows assignments or searches names. \
    Parameters: nurse PATIENT_INDEX, or: patient NURSE_INDEX, or: KEYWORD [MORE_KEYWORDS]...";

pub const HELP_MESSAGE: &str = "Commands:
  add n/NAME d/DD/MM/YYYY p/PHONE a/ADDRESS b/BLOOD_TYPE ap/nurse|patient [e/EMAIL] [nok/NAME PHONE] [t/TAG]... [mh/HISTORY]...
  edit INDEX [n/NAME] [d/DOB] [p/PHONE] [e/EMAIL] [a/ADDRESS] [b/BLOOD_TYPE] [ap/ROLE] [nok/NAME PHONE] [t/TAG]... [mh/HISTORY]...
  delete INDEX
  view INDEX
  list [nurse|patient|checkup]
  assign PATIENT_INDEX NURSE_INDEX
  assign delete NURSE_NAME PATIENT_INDEX
  schedule add|delete for patient INDEX DD/MM/YYYY HHmm
  find nurse PATIENT_INDEX
  find patient NURSE_INDEX
  find KEYWORD [MORE_KEYWORDS]...
  help
  exit";

const NAME: &str = "n/";
const DATE_OF_BIRTH: &str = "d/";
const PHONE: &str = "p/";
const EMAIL: &str = "e/";
const ADDRESS: &str = "a/";
const BLOOD_TYPE: &str = "b/";
const APPOINTMENT: &str = "ap/";
const NEXT_OF_KIN: &str = "nok/";
const TAG: &str = "t/";
const MEDICAL_HISTORY: &str = "mh/";

const PREFIXES: [&str; 10] = [
    NAME,
    DATE_OF_BIRTH,
    PHONE,
    EMAIL,
    ADDRESS,
    BLOOD_TYPE,
    APPOINTMENT,
    NEXT_OF_KIN,
    TAG,
    MEDICAL_HISTORY,
];

const SINGLE_VALUED: [&str; 8] = [
    NAME,
    DATE_OF_BIRTH,
    PHONE,
    EMAIL,
    ADDRESS,
    BLOOD_TYPE,
    APPOINTMENT,
    NEXT_OF_KIN,
];

/// Errors from turning a line into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid command format!\n{0}")]
    InvalidFormat(&'static str),

    #[error("Index is not a non-zero unsigned integer: {0}")]
    InvalidIndex(String),

    #[error("Multiple values specified for the following single-valued field(s): {0}")]
    DuplicatePrefix(String),

    #[error("Invalid input type! Only 'nurse', 'patient' or 'checkup' are allowed.")]
    InvalidListFilter(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Person),
    Edit(Index, EditDescriptor),
    Delete(Index),
    View(Index),
    List(ListFilter),
    Assign { patient: Index, nurse: Index },
    Unassign { nurse: Name, patient: Index },
    Schedule {
        action: ScheduleAction,
        patient: Index,
        date: NaiveDate,
        time: NaiveTime,
    },
    FindNurse(Index),
    FindPatient(Index),
    /// Name search; shows records whose name contains any keyword.
    Find(Vec<String>),
    Help,
    Exit,
}

/// Parse one line of user input.
pub fn parse_command(input: &str) -> ParseResult<Command> {
    let trimmed = input.trim();
    let (word, args) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    match word.to_lowercase().as_str() {
        "add" => parse_add(args),
        "edit" => parse_edit(args),
        "delete" => parse_single_index(args, DELETE_USAGE).map(Command::Delete),
        "view" => parse_single_index(args, VIEW_USAGE).map(Command::View),
        "list" => parse_list(args),
        "assign" => parse_assign(args),
        "schedule" => parse_schedule(args),
        "find" => parse_find(args),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        "" => Err(ParseError::UnknownCommand(String::new())),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Parse a 1-based index.
pub fn parse_index(raw: &str) -> ParseResult<Index> {
    let trimmed = raw.trim();
    trimmed
        .parse::<usize>()
        .ok()
        .and_then(Index::new)
        .ok_or_else(|| ParseError::InvalidIndex(trimmed.to_string()))
}

// =========================================================================
// Prefixed arguments
// =========================================================================

/// Arguments split on `prefix/` markers, in input order.
#[derive(Debug, Default)]
struct ArgumentMap {
    preamble: String,
    values: Vec<(&'static str, String)>,
}

impl ArgumentMap {
    /// A prefix only counts when it starts the input or follows whitespace.
    fn tokenize(args: &str) -> Self {
        let padded = format!(" {}", args);
        let mut found: Vec<(usize, &'static str)> = Vec::new();
        for prefix in PREFIXES {
            let needle = format!(" {}", prefix);
            let mut from = 0;
            while let Some(offset) = padded[from..].find(&needle) {
                let at = from + offset;
                found.push((at, prefix));
                from = at + 1;
            }
        }
        found.sort_unstable();

        let preamble_end = found.first().map_or(padded.len(), |(at, _)| *at);
        let values = found
            .iter()
            .enumerate()
            .map(|(i, (at, prefix))| {
                let start = at + 1 + prefix.len();
                let end = found.get(i + 1).map_or(padded.len(), |(next, _)| *next);
                (*prefix, padded[start..end].trim().to_string())
            })
            .collect();

        Self {
            preamble: padded[..preamble_end].trim().to_string(),
            values,
        }
    }

    fn value(&self, prefix: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
    }

    fn all(&self, prefix: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn reject_duplicates(&self) -> ParseResult<()> {
        let duplicated: Vec<&str> = SINGLE_VALUED
            .iter()
            .copied()
            .filter(|prefix| self.all(prefix).len() > 1)
            .collect();
        if duplicated.is_empty() {
            Ok(())
        } else {
            Err(ParseError::DuplicatePrefix(duplicated.join(" ")))
        }
    }

    fn required<T: std::str::FromStr<Err = ModelError>>(&self, prefix: &str) -> ParseResult<T> {
        let raw = self
            .value(prefix)
            .ok_or(ParseError::InvalidFormat(ADD_USAGE))?;
        Ok(raw.parse::<T>()?)
    }

    fn optional<T: std::str::FromStr<Err = ModelError>>(&self, prefix: &str) -> ParseResult<Option<T>> {
        self.value(prefix)
            .map(|raw| raw.parse::<T>())
            .transpose()
            .map_err(ParseError::from)
    }

    fn set<T: std::str::FromStr<Err = ModelError> + Ord>(&self, prefix: &str) -> ParseResult<BTreeSet<T>> {
        self.all(prefix)
            .into_iter()
            .map(|raw| raw.parse::<T>().map_err(ParseError::from))
            .collect()
    }

    /// For edits: absent leaves the set alone, a single empty value clears it.
    fn replacement_set<T: std::str::FromStr<Err = ModelError> + Ord>(
        &self,
        prefix: &str,
    ) -> ParseResult<Option<BTreeSet<T>>> {
        let raw = self.all(prefix);
        match raw.as_slice() {
            [] => Ok(None),
            [only] if only.is_empty() => Ok(Some(BTreeSet::new())),
            _ => self.set(prefix).map(Some),
        }
    }
}

// =========================================================================
// Commands
// =========================================================================

fn parse_add(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    if !map.preamble.is_empty() {
        return Err(ParseError::InvalidFormat(ADD_USAGE));
    }
    map.reject_duplicates()?;

    let name: Name = map.required(NAME)?;
    let date_of_birth: DateOfBirth = map.required(DATE_OF_BIRTH)?;
    let phone: Phone = map.required(PHONE)?;
    let address: Address = map.required(ADDRESS)?;
    let blood_type: BloodType = map.required(BLOOD_TYPE)?;
    let role: Role = map.required(APPOINTMENT)?;

    let email = match map.value(EMAIL) {
        Some(raw) => Email::parse_optional(raw)?,
        None => None,
    };
    let next_of_kin: NextOfKin = map.optional(NEXT_OF_KIN)?.unwrap_or_default();

    let person = Person::builder(name, date_of_birth, phone, address, blood_type, role)
        .email(email)
        .next_of_kin(next_of_kin)
        .tags(map.set::<Tag>(TAG)?)
        .medical_history(map.set::<MedicalHistory>(MEDICAL_HISTORY)?)
        .build()?;
    Ok(Command::Add(person))
}

fn parse_edit(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    if map.preamble.is_empty() {
        return Err(ParseError::InvalidFormat(EDIT_USAGE));
    }
    let index = parse_index(&map.preamble)?;
    map.reject_duplicates()?;

    let descriptor = EditDescriptor {
        name: map.optional(NAME)?,
        date_of_birth: map.optional(DATE_OF_BIRTH)?,
        phone: map.optional(PHONE)?,
        email: map.value(EMAIL).map(Email::parse_optional).transpose()?,
        address: map.optional(ADDRESS)?,
        blood_type: map.optional(BLOOD_TYPE)?,
        role: map.optional(APPOINTMENT)?,
        next_of_kin: map.optional(NEXT_OF_KIN)?,
        tags: map.replacement_set(TAG)?,
        medical_history: map.replacement_set(MEDICAL_HISTORY)?,
    };
    Ok(Command::Edit(index, descriptor))
}

fn parse_single_index(args: &str, usage: &'static str) -> ParseResult<Index> {
    let words: Vec<&str> = args.split_whitespace().collect();
    match words.as_slice() {
        [index] => parse_index(index),
        _ => Err(ParseError::InvalidFormat(usage)),
    }
}

fn parse_list(args: &str) -> ParseResult<Command> {
    let filter = match args.trim().to_lowercase().as_str() {
        "" => ListFilter::All,
        "checkup" => ListFilter::WithCheckups,
        other => other
            .parse::<Role>()
            .map(ListFilter::Role)
            .map_err(|_| ParseError::InvalidListFilter(other.to_string()))?,
    };
    Ok(Command::List(filter))
}

fn parse_assign(args: &str) -> ParseResult<Command> {
    let words: Vec<&str> = args.split_whitespace().collect();
    match words.as_slice() {
        [first, rest @ ..] if first.eq_ignore_ascii_case("delete") => {
            let (patient, nurse_words) = rest
                .split_last()
                .filter(|(_, name)| !name.is_empty())
                .ok_or(ParseError::InvalidFormat(ASSIGN_USAGE))?;
            Ok(Command::Unassign {
                nurse: nurse_words.join(" ").parse()?,
                patient: parse_index(patient)?,
            })
        }
        [patient, nurse] => Ok(Command::Assign {
            patient: parse_index(patient)?,
            nurse: parse_index(nurse)?,
        }),
        _ => Err(ParseError::InvalidFormat(ASSIGN_USAGE)),
    }
}

fn parse_schedule(args: &str) -> ParseResult<Command> {
    let lowered = args.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let (action, rest) = match words.as_slice() {
        ["add", rest @ ..] => (ScheduleAction::Add, rest),
        ["delete", rest @ ..] => (ScheduleAction::Delete, rest),
        _ => return Err(ParseError::InvalidFormat(SCHEDULE_USAGE)),
    };
    let rest = match rest {
        ["for", "patient", tail @ ..] => tail,
        other => other,
    };

    match rest {
        [index, date, time] => {
            let patient = parse_index(index)?;
            let (date, time) = Checkup::parse_input(date, time)?;
            Ok(Command::Schedule {
                action,
                patient,
                date,
                time,
            })
        }
        [_, _] | [_] => Err(ModelError::MissingDateOrTime.into()),
        _ => Err(ParseError::InvalidFormat(SCHEDULE_USAGE)),
    }
}

/// `find nurse [of patient] INDEX`, `find patient [of nurse] INDEX`, or
/// `find KEYWORD...` to search names.
fn parse_find(args: &str) -> ParseResult<Command> {
    let words: Vec<&str> = args.split_whitespace().collect();
    let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let lowered: Vec<&str> = lowered.iter().map(String::as_str).collect();
    match lowered.as_slice() {
        [] => Err(ParseError::InvalidFormat(FIND_USAGE)),
        ["nurse", "of", "patient", index] | ["nurse", index] => {
            parse_index(index).map(Command::FindNurse)
        }
        ["patient", "of", "nurse", index] | ["patient", index] => {
            parse_index(index).map(Command::FindPatient)
        }
        ["nurse" | "patient", ..] if lowered.len() > 1 => Err(ParseError::InvalidFormat(FIND_USAGE)),
        _ => Ok(Command::Find(words.iter().map(|w| w.to_string()).collect())),
    }
}
