//! Starter roster used when no data has been saved yet.

use crate::models::{BloodType, Email, MedicalHistory, ModelResult, Person, Tag};

struct SampleRow {
    name: &'static str,
    date_of_birth: &'static str,
    phone: &'static str,
    email: &'static str,
    address: &'static str,
    appointment: &'static str,
    tag: &'static str,
    medical_history: &'static [&'static str],
}

const SAMPLE_ROWS: &[SampleRow] = &[
    SampleRow {
        name: "Alex Yeoh",
        date_of_birth: "01/01/2001",
        phone: "87438807",
        email: "alexyeoh@example.com",
        address: "Blk 30 Geylang Street 29, #06-40",
        appointment: "Nurse",
        tag: "Manager",
        medical_history: &[],
    },
    SampleRow {
        name: "Bernice Yu",
        date_of_birth: "01/01/1990",
        phone: "99272758",
        email: "berniceyu@example.com",
        address: "Blk 30 Lorong 3 Serangoon Gardens, #07-18",
        appointment: "Nurse",
        tag: "Newcomer",
        medical_history: &[],
    },
    SampleRow {
        name: "Charlotte Oliveiro",
        date_of_birth: "12/05/1989",
        phone: "93210283",
        email: "charlotte@example.com",
        address: "Blk 11 Ang Mo Kio Street 74, #11-04",
        appointment: "Nurse",
        tag: "Newcomer",
        medical_history: &[],
    },
    SampleRow {
        name: "David Li",
        date_of_birth: "14/07/1989",
        phone: "91031282",
        email: "lidavid@example.com",
        address: "Blk 436 Serangoon Gardens Street 26, #16-43",
        appointment: "Nurse",
        tag: "Manager",
        medical_history: &[],
    },
    SampleRow {
        name: "Irfan Ibrahim",
        date_of_birth: "04/04/2004",
        phone: "92492021",
        email: "irfan@example.com",
        address: "Blk 47 Tampines Street 20, #17-35",
        appointment: "Nurse",
        tag: "Phlebotomy",
        medical_history: &[],
    },
    SampleRow {
        name: "Roy Balakrishnan",
        date_of_birth: "11/09/2001",
        phone: "92624417",
        email: "royb@example.com",
        address: "Blk 45 Aljunied Street 85, #11-31",
        appointment: "Patient",
        tag: "Anxious",
        medical_history: &["Diabetes"],
    },
];

/// Five nurses and one patient.
pub fn sample_persons() -> ModelResult<Vec<Person>> {
    SAMPLE_ROWS.iter().map(sample_person).collect()
}

fn sample_person(row: &SampleRow) -> ModelResult<Person> {
    Person::builder(
        row.name.parse()?,
        row.date_of_birth.parse()?,
        row.phone.parse()?,
        row.address.parse()?,
        BloodType::AbPositive,
        row.appointment.parse()?,
    )
    .email(Some(row.email.parse::<Email>()?))
    .tags([row.tag.parse::<Tag>()?])
    .next_of_kin("Alexis 91023434".parse()?)
    .medical_history(
        row.medical_history
            .iter()
            .map(|m| m.parse::<MedicalHistory>())
            .collect::<ModelResult<Vec<_>>>()?,
    )
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_roster_is_valid() {
        let persons = sample_persons().unwrap();
        assert_eq!(persons.len(), 6);
        assert_eq!(persons.iter().filter(|p| p.is_nurse()).count(), 5);
        assert_eq!(persons[5].medical_history().len(), 1);
    }
}
