//! Validated field values for person records.
//!
//! Every type here can only be built through `FromStr` (or an explicit
//! constructor), so a `Person` never holds an unvalidated field.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::{ModelError, ModelResult};

/// Display/input format for calendar dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Maximum number of digits across all phone groups.
const MAX_PHONE_DIGITS: usize = 17;

/// Minimum digits per phone group.
const MIN_PHONE_GROUP: usize = 3;

/// Sentinel shown when no next of kin was recorded.
pub const NEXT_OF_KIN_NOT_PROVIDED: &str = "Next of Kin not provided";

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =========================================================================
// Name
// =========================================================================

/// A person's full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used for relationship lookups.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_uppercase() == collapse_whitespace(other).to_uppercase()
    }
}

impl FromStr for Name {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let collapsed = collapse_whitespace(s);
        if collapsed.is_empty() || !collapsed.chars().all(|c| c.is_alphanumeric() || c == ' ') {
            return Err(ModelError::InvalidName);
        }
        Ok(Self(collapsed))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// Date of birth
// =========================================================================

/// A date of birth in `dd/MM/yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    /// Wrap an already-trusted date (e.g. loaded from storage).
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a date of birth that is not after `today`.
    pub fn new(date: NaiveDate, today: NaiveDate) -> ModelResult<Self> {
        if date > today {
            return Err(ModelError::FutureDateOfBirth);
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for DateOfBirth {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| ModelError::InvalidDateOfBirth)
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

// =========================================================================
// Phone
// =========================================================================

/// A phone number made of space-separated digit groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits only, used for identity comparison.
    pub fn normalized(&self) -> String {
        self.0.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

impl FromStr for Phone {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let groups: Vec<&str> = s.split_whitespace().collect();
        if groups.is_empty() {
            return Err(ModelError::InvalidPhone);
        }

        let well_formed = groups
            .iter()
            .all(|g| g.len() >= MIN_PHONE_GROUP && g.chars().all(|c| c.is_ascii_digit()));
        let digit_count: usize = groups.iter().map(|g| g.len()).sum();
        let all_zeros = groups.iter().all(|g| g.chars().all(|c| c == '0'));

        if !well_formed || digit_count > MAX_PHONE_DIGITS || all_zeros {
            return Err(ModelError::InvalidPhone);
        }
        Ok(Self(groups.join(" ")))
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// Email
// =========================================================================

/// An email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse optional user input; blank or `nil` means no email.
    pub fn parse_optional(input: &str) -> ModelResult<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nil") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    fn valid_local(local: &str) -> bool {
        const SPECIAL: &[char] = &['+', '_', '.', '-'];
        !local.is_empty()
            && local.chars().all(|c| c.is_ascii_alphanumeric() || SPECIAL.contains(&c))
            && !local.starts_with(SPECIAL)
            && !local.ends_with(SPECIAL)
    }

    fn valid_domain(domain: &str) -> bool {
        let labels: Vec<&str> = domain.split('.').collect();
        let label_ok = |label: &&str| {
            !label.is_empty()
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        };
        labels.iter().all(label_ok) && labels.last().is_some_and(|l| l.len() >= 2)
    }
}

impl FromStr for Email {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let trimmed = s.trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !domain.contains('@')
                    && Self::valid_local(local)
                    && Self::valid_domain(domain) =>
            {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(ModelError::InvalidEmail),
        }
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// Address
// =========================================================================

/// A postal address (free text).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidAddress);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// Blood type
// =========================================================================

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodType {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

impl BloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl FromStr for BloodType {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            _ => Err(ModelError::InvalidBloodType),
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================================
// Role
// =========================================================================

/// Whether a record describes a nurse or a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Nurse,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Nurse => "Nurse",
            Role::Patient => "Patient",
        }
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "nurse" => Ok(Role::Nurse),
            "patient" => Ok(Role::Patient),
            _ => Err(ModelError::InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================================
// Tag
// =========================================================================

/// A free-form alphanumeric label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Tag {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(char::is_alphanumeric) {
            return Err(ModelError::InvalidTag);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

// =========================================================================
// Next of kin
// =========================================================================

/// Emergency contact: a single-word name followed by a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NextOfKin {
    #[default]
    NotProvided,
    Contact { name: Name, phone: Phone },
}

impl FromStr for NextOfKin {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == NEXT_OF_KIN_NOT_PROVIDED {
            return Ok(NextOfKin::NotProvided);
        }

        let (name, phone) = trimmed
            .split_once(' ')
            .ok_or(ModelError::InvalidNextOfKin)?;
        let name: Name = name.parse().map_err(|_| ModelError::InvalidNextOfKin)?;
        let phone: Phone = phone.parse().map_err(|_| ModelError::InvalidNextOfKin)?;
        Ok(NextOfKin::Contact { name, phone })
    }
}

impl fmt::Display for NextOfKin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextOfKin::NotProvided => f.write_str(NEXT_OF_KIN_NOT_PROVIDED),
            NextOfKin::Contact { name, phone } => write!(f, "{} {}", name, phone),
        }
    }
}

// =========================================================================
// Medical history
// =========================================================================

/// One medical-history entry (patients only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MedicalHistory(String);

impl MedicalHistory {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MedicalHistory {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let collapsed = collapse_whitespace(s);
        if collapsed.is_empty() || !collapsed.chars().all(|c| c.is_alphanumeric() || c == ' ') {
            return Err(ModelError::InvalidMedicalHistory);
        }
        Ok(Self(collapsed))
    }
}

impl fmt::Display for MedicalHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}
