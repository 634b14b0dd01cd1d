//! Person records (nurses and patients).

use std::collections::BTreeSet;
use std::fmt;

use uuid::Uuid;

use super::{
    Address, BloodType, Checkup, DateOfBirth, Email, MedicalHistory, ModelError, ModelResult,
    Name, NextOfKin, NurseAssignments, Phone, Role, Tag,
};

/// An immutable nurse or patient record.
///
/// Fields are only readable; every change goes through [`Person::to_builder`]
/// or one of the `with_*` methods and yields a new record with the same
/// `local_id`.
#[derive(Debug, Clone)]
pub struct Person {
    local_id: Uuid,
    name: Name,
    date_of_birth: DateOfBirth,
    phone: Phone,
    email: Option<Email>,
    address: Address,
    blood_type: BloodType,
    role: Role,
    tags: BTreeSet<Tag>,
    next_of_kin: NextOfKin,
    medical_history: BTreeSet<MedicalHistory>,
    checkups: BTreeSet<Checkup>,
    assignments: NurseAssignments,
}

impl Person {
    /// Start building a record from its required fields.
    pub fn builder(
        name: Name,
        date_of_birth: DateOfBirth,
        phone: Phone,
        address: Address,
        blood_type: BloodType,
        role: Role,
    ) -> PersonBuilder {
        PersonBuilder {
            local_id: None,
            name,
            date_of_birth,
            phone,
            email: None,
            address,
            blood_type,
            role,
            tags: BTreeSet::new(),
            next_of_kin: NextOfKin::NotProvided,
            medical_history: BTreeSet::new(),
            checkups: BTreeSet::new(),
            assignments: NurseAssignments::new(),
        }
    }

    /// A builder pre-filled with this record, keeping its `local_id`.
    pub fn to_builder(&self) -> PersonBuilder {
        PersonBuilder {
            local_id: Some(self.local_id),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth,
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            blood_type: self.blood_type,
            role: self.role,
            tags: self.tags.clone(),
            next_of_kin: self.next_of_kin.clone(),
            medical_history: self.medical_history.clone(),
            checkups: self.checkups.clone(),
            assignments: self.assignments.clone(),
        }
    }

    pub fn local_id(&self) -> Uuid {
        self.local_id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn next_of_kin(&self) -> &NextOfKin {
        &self.next_of_kin
    }

    pub fn medical_history(&self) -> &BTreeSet<MedicalHistory> {
        &self.medical_history
    }

    /// Checkups, earliest first.
    pub fn checkups(&self) -> &BTreeSet<Checkup> {
        &self.checkups
    }

    pub fn assignments(&self) -> &NurseAssignments {
        &self.assignments
    }

    pub fn is_nurse(&self) -> bool {
        self.role == Role::Nurse
    }

    pub fn is_patient(&self) -> bool {
        self.role == Role::Patient
    }

    pub fn has_checkups(&self) -> bool {
        !self.checkups.is_empty()
    }

    pub fn earliest_checkup(&self) -> Option<&Checkup> {
        self.checkups.iter().next()
    }

    /// Whether this patient is assigned the nurse called `nurse`.
    pub fn is_assigned_to(&self, nurse: &Name) -> bool {
        self.is_patient() && self.assignments.contains(nurse)
    }

    /// Identity check used for duplicate detection: name, phone digits and
    /// date of birth must all match.
    pub fn is_same_person(&self, other: &Person) -> bool {
        self.name == other.name
            && self.phone.normalized() == other.phone.normalized()
            && self.date_of_birth == other.date_of_birth
    }

    /// Free-form tags followed by assignment markers, as displayed and stored.
    pub fn display_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| t.as_str().to_string())
            .chain(self.assignments.markers())
            .collect()
    }

    /// Copy with a new assignment set. Fails on nurses.
    pub fn with_assignments(&self, assignments: NurseAssignments) -> ModelResult<Self> {
        self.to_builder().assignments(assignments).build()
    }

    /// Copy with a new checkup set.
    pub fn with_checkups(&self, checkups: BTreeSet<Checkup>) -> Self {
        Self {
            checkups,
            ..self.clone()
        }
    }
}

/// Full field equality; the synthetic `local_id` is not part of it.
impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.date_of_birth == other.date_of_birth
            && self.phone == other.phone
            && self.email == other.email
            && self.address == other.address
            && self.blood_type == other.blood_type
            && self.role == other.role
            && self.tags == other.tags
            && self.next_of_kin == other.next_of_kin
            && self.medical_history == other.medical_history
            && self.checkups == other.checkups
            && self.assignments == other.assignments
    }
}

impl Eq for Person {}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; Date of Birth: {}; Phone: {}; Email: {}; Address: {}; Blood Type: {}; \
             Appointment: {}; Next of Kin: {}; Tags: ",
            self.name,
            self.date_of_birth,
            self.phone,
            self.email.as_ref().map(Email::as_str).unwrap_or("-"),
            self.address,
            self.blood_type,
            self.role,
            self.next_of_kin,
        )?;
        for tag in self.display_tags() {
            write!(f, "[{}]", tag)?;
        }
        if !self.medical_history.is_empty() {
            f.write_str("; Medical History: ")?;
            for entry in &self.medical_history {
                write!(f, "{}", entry)?;
            }
        }
        if !self.checkups.is_empty() {
            let checkups: Vec<String> = self.checkups.iter().map(Checkup::to_string).collect();
            write!(f, "; Checkups: {}", checkups.join(", "))?;
        }
        Ok(())
    }
}

/// Builder for [`Person`]; `build` enforces the role invariants.
#[derive(Debug, Clone)]
pub struct PersonBuilder {
    local_id: Option<Uuid>,
    name: Name,
    date_of_birth: DateOfBirth,
    phone: Phone,
    email: Option<Email>,
    address: Address,
    blood_type: BloodType,
    role: Role,
    tags: BTreeSet<Tag>,
    next_of_kin: NextOfKin,
    medical_history: BTreeSet<MedicalHistory>,
    checkups: BTreeSet<Checkup>,
    assignments: NurseAssignments,
}

impl PersonBuilder {
    pub fn local_id(mut self, local_id: Uuid) -> Self {
        self.local_id = Some(local_id);
        self
    }

    pub fn name(mut self, name: Name) -> Self {
        self.name = name;
        self
    }

    pub fn date_of_birth(mut self, date_of_birth: DateOfBirth) -> Self {
        self.date_of_birth = date_of_birth;
        self
    }

    pub fn phone(mut self, phone: Phone) -> Self {
        self.phone = phone;
        self
    }

    pub fn email(mut self, email: Option<Email>) -> Self {
        self.email = email;
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn blood_type(mut self, blood_type: BloodType) -> Self {
        self.blood_type = blood_type;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn tags<I: IntoIterator<Item = Tag>>(mut self, tags: I) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn next_of_kin(mut self, next_of_kin: NextOfKin) -> Self {
        self.next_of_kin = next_of_kin;
        self
    }

    pub fn medical_history<I: IntoIterator<Item = MedicalHistory>>(mut self, entries: I) -> Self {
        self.medical_history = entries.into_iter().collect();
        self
    }

    pub fn checkups<I: IntoIterator<Item = Checkup>>(mut self, checkups: I) -> Self {
        self.checkups = checkups.into_iter().collect();
        self
    }

    pub fn assignments(mut self, assignments: NurseAssignments) -> Self {
        self.assignments = assignments;
        self
    }

    /// The role the built record will have.
    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn build(self) -> ModelResult<Person> {
        if self.role == Role::Nurse && !self.medical_history.is_empty() {
            return Err(ModelError::MedicalHistoryOnNurse);
        }
        if self.role == Role::Nurse && !self.assignments.is_empty() {
            return Err(ModelError::AssignmentsOnNurse);
        }

        Ok(Person {
            local_id: self.local_id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            date_of_birth: self.date_of_birth,
            phone: self.phone,
            email: self.email,
            address: self.address,
            blood_type: self.blood_type,
            role: self.role,
            tags: self.tags,
            next_of_kin: self.next_of_kin,
            medical_history: self.medical_history,
            checkups: self.checkups,
            assignments: self.assignments,
        })
    }
}
