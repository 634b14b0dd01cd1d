//! Serialized shape of a person record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    parse_nurse_marker, Checkup, Email, MedicalHistory, ModelError, Name, NurseAssignments, Person,
    Tag,
};

use super::{StorageError, StorageResult};

/// One checkup as stored: `dd/MM/yyyy` and `HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCheckup {
    pub date: String,
    pub time: String,
}

/// One person as stored. Assignments live in `tags` as `"Nurse <name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<Uuid>,
    pub name: String,
    pub date_of_birth: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub blood_type: String,
    pub appointment: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub next_of_kin: String,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub checkups: Vec<StoredCheckup>,
}

/// The whole stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRoster {
    pub persons: Vec<StoredPerson>,
}

impl From<&Person> for StoredPerson {
    fn from(person: &Person) -> Self {
        Self {
            local_id: Some(person.local_id()),
            name: person.name().to_string(),
            date_of_birth: person.date_of_birth().to_string(),
            phone: person.phone().to_string(),
            email: person.email().map(ToString::to_string),
            address: person.address().to_string(),
            blood_type: person.blood_type().to_string(),
            appointment: person.role().to_string(),
            tags: person.display_tags(),
            next_of_kin: person.next_of_kin().to_string(),
            medical_history: person
                .medical_history()
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            checkups: person
                .checkups()
                .iter()
                .map(|c| StoredCheckup {
                    date: c.date_string(),
                    time: c.time_string(),
                })
                .collect(),
        }
    }
}

impl TryFrom<StoredPerson> for Person {
    type Error = StorageError;

    fn try_from(stored: StoredPerson) -> StorageResult<Self> {
        let invalid = |field: &str| {
            let name = stored.name.clone();
            let field = field.to_string();
            move |e: ModelError| {
                StorageError::InvalidRecord(format!("{} ({}): {}", name, field, e))
            }
        };

        let mut tags = Vec::new();
        let mut nurses = Vec::new();
        for text in &stored.tags {
            match parse_nurse_marker(text) {
                Some(nurse) => nurses.push(nurse.parse::<Name>().map_err(invalid("tags"))?),
                None => tags.push(text.parse::<Tag>().map_err(invalid("tags"))?),
            }
        }
        let assignments = NurseAssignments::from_names(nurses).map_err(invalid("tags"))?;

        let medical_history = stored
            .medical_history
            .iter()
            .map(|m| m.parse::<MedicalHistory>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid("medicalHistory"))?;
        let checkups = stored
            .checkups
            .iter()
            .map(|c| Checkup::from_stored(&c.date, &c.time))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid("checkups"))?;

        let mut builder = Person::builder(
            stored.name.parse().map_err(invalid("name"))?,
            stored.date_of_birth.parse().map_err(invalid("dateOfBirth"))?,
            stored.phone.parse().map_err(invalid("phone"))?,
            stored.address.parse().map_err(invalid("address"))?,
            stored.blood_type.parse().map_err(invalid("bloodType"))?,
            stored.appointment.parse().map_err(invalid("appointment"))?,
        )
        .email(
            Email::parse_optional(stored.email.as_deref().unwrap_or_default())
                .map_err(invalid("email"))?,
        )
        .next_of_kin(stored.next_of_kin.parse().map_err(invalid("nextOfKin"))?)
        .tags(tags)
        .medical_history(medical_history)
        .checkups(checkups)
        .assignments(assignments);

        if let Some(local_id) = stored.local_id {
            builder = builder.local_id(local_id);
        }
        builder.build().map_err(invalid("appointment"))
    }
}
