//! Domain models for the clinic roster.

mod assignment;
mod checkup;
mod fields;
mod person;

pub use assignment::*;
pub use checkup::*;
pub use fields::*;
pub use person::*;

use thiserror::Error;

/// Validation errors raised while constructing model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Names should only contain alphanumeric characters and spaces, and it should not be blank")]
    InvalidName,

    #[error("Date Of Birth can only take the format: DD/MM/YYYY")]
    InvalidDateOfBirth,

    #[error("Date Of Birth cannot be in the future")]
    FutureDateOfBirth,

    #[error(
        "Invalid phone number format! Phone numbers need groups of at least 3 digits separated \
         by single spaces, cannot be all zeros and cannot exceed 17 digits"
    )]
    InvalidPhone,

    #[error("Emails should be of the format local-part@domain")]
    InvalidEmail,

    #[error("Addresses can take any values, and it should not be blank")]
    InvalidAddress,

    #[error("Blood type should only be A+, A-, B+, B-, AB+, AB-, O+ or O-")]
    InvalidBloodType,

    #[error("Appointment should only be Nurse or Patient")]
    InvalidRole,

    #[error("Tags names should be alphanumeric")]
    InvalidTag,

    #[error("Next of Kin must be in the format: 'Name Phone', e.g., 'Jane 91234567'.")]
    InvalidNextOfKin,

    #[error("Medical history should only contain alphanumeric characters and spaces, and it should not be blank")]
    InvalidMedicalHistory,

    #[error("Medical history should not be added to a nurse.")]
    MedicalHistoryOnNurse,

    #[error("Nurses cannot be assigned to a nurse.")]
    AssignmentsOnNurse,

    #[error("This patient already has {max} assigned nurses!")]
    TooManyNurses { max: usize },

    #[error("Nurse {0} is already assigned to this patient.")]
    NurseAlreadyAssigned(String),

    #[error("Checkup date and time must both be provided")]
    MissingDateOrTime,

    #[error("Invalid date format. Use dd/MM/yyyy")]
    InvalidDate,

    #[error("Invalid time values. Use HHmm")]
    InvalidTime,

    #[error("Checkup must be scheduled between 9:00 AM and 5:00 PM")]
    OutsideBusinessHours,

    #[error("Checkup cannot be scheduled in the past")]
    PastDate,
}

pub type ModelResult<T> = Result<T, ModelError>;
