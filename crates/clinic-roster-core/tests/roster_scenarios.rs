//! End-to-end roster scenarios through the `ClinicRoster` facade.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use clinic_roster_core::models::{BloodType, MedicalHistory, Name};
use clinic_roster_core::{
    ClinicRoster, CommandError, EditDescriptor, FixedClock, Index, JsonFileStorage, ListFilter,
    Person, Role, Roster, RosterStorage, ScheduleAction, SqliteStorage, TransitionBlock,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn person(name: &str, phone: &str, role: Role) -> Person {
    Person::builder(
        name.parse().unwrap(),
        "15/08/1992".parse().unwrap(),
        phone.parse().unwrap(),
        "Blk 123 Clementi Ave 3".parse().unwrap(),
        BloodType::ANegative,
        role,
    )
    .build()
    .unwrap()
}

fn idx(n: usize) -> Index {
    Index::new(n).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%d/%m/%Y").unwrap()
}

fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H%M").unwrap()
}

/// Alice (patient), Bob, Carol, Dan (nurses).
fn clinic() -> ClinicRoster {
    let mut roster = Roster::new();
    roster.add(person("Alice", "91234567", Role::Patient)).unwrap();
    roster.add(person("Bob", "92345678", Role::Nurse)).unwrap();
    roster.add(person("Carol", "93456789", Role::Nurse)).unwrap();
    roster.add(person("Dan", "94567890", Role::Nurse)).unwrap();
    ClinicRoster::in_memory(roster, Box::new(FixedClock(now())))
}

#[test]
fn test_third_nurse_is_rejected() {
    let mut clinic = clinic();
    clinic.assign(idx(1), idx(2)).unwrap();
    clinic.assign(idx(1), idx(3)).unwrap();

    let err = clinic.assign(idx(1), idx(4)).unwrap_err();
    assert!(matches!(err, CommandError::TooManyNurses { max: 2 }));
    assert_eq!(err.to_string(), "This patient already has 2 assigned nurses!");

    let alice = clinic.roster().get(idx(1)).unwrap();
    assert_eq!(alice.display_tags(), vec!["Nurse Bob", "Nurse Carol"]);
}

#[test]
fn test_checkups_must_be_thirty_minutes_apart() {
    let mut clinic = clinic();
    let created = clinic
        .schedule(ScheduleAction::Add, idx(1), date("24/12/2025"), time("1000"))
        .unwrap();
    assert!(created.warning.is_some());

    let err = clinic
        .schedule(ScheduleAction::Add, idx(1), date("24/12/2025"), time("1015"))
        .unwrap_err();
    assert!(matches!(err, CommandError::TooCloseCheckup(_)));
    assert_eq!(clinic.roster().get(idx(1)).unwrap().checkups().len(), 1);
}

#[test]
fn test_past_checkup_is_rejected() {
    let mut clinic = clinic();
    let err = clinic
        .schedule(ScheduleAction::Add, idx(1), date("01/01/2020"), time("1000"))
        .unwrap_err();
    assert!(matches!(err, CommandError::PastDate));
}

#[test]
fn test_patients_of_nurse_keeps_active_filter() {
    let mut clinic = clinic();
    clinic.assign(idx(1), idx(2)).unwrap();
    clinic.list(ListFilter::Role(Role::Nurse));

    let found = clinic.patients_of_nurse(idx(1)).unwrap();
    assert_eq!(found.message, "Patient(s) assigned to nurse Bob: Alice.");
    assert_eq!(clinic.roster().filter(), &ListFilter::Role(Role::Nurse));

    assert!(clinic.patients_of_nurse(idx(2)).is_err());
    assert_eq!(clinic.roster().filter(), &ListFilter::Role(Role::Nurse));
    assert_eq!(clinic.displayed_persons().len(), 3);
}

#[test]
fn test_assignment_blocks_role_change_and_rename() {
    let mut clinic = clinic();
    clinic.assign(idx(1), idx(2)).unwrap();

    let to_nurse = EditDescriptor {
        role: Some(Role::Nurse),
        ..Default::default()
    };
    assert!(matches!(
        clinic.edit_person(idx(1), to_nurse.clone()),
        Err(CommandError::BlockedRoleTransition(TransitionBlock::PatientHasNurse))
    ));

    let rename = EditDescriptor {
        name: Some("Bobby".parse().unwrap()),
        ..Default::default()
    };
    assert!(matches!(
        clinic.edit_person(idx(2), rename.clone()),
        Err(CommandError::BlockedRoleTransition(TransitionBlock::NurseRenameBlocked))
    ));

    let bob: Name = "Bob".parse().unwrap();
    clinic.unassign(&bob, idx(1)).unwrap();
    clinic.edit_person(idx(2), rename).unwrap();
    clinic.edit_person(idx(1), to_nurse).unwrap();
    assert!(clinic.roster().get(idx(1)).unwrap().is_nurse());
}

#[test]
fn test_nurses_differing_only_in_case_are_independent() {
    let mut roster = Roster::new();
    roster.add(person("Alice", "91234567", Role::Patient)).unwrap();
    roster.add(person("Bob", "92345678", Role::Nurse)).unwrap();
    roster.add(person("bob", "95556666", Role::Nurse)).unwrap();
    let mut clinic = ClinicRoster::in_memory(roster, Box::new(FixedClock(now())));
    clinic.assign(idx(1), idx(2)).unwrap();

    assert!(matches!(
        clinic.patients_of_nurse(idx(3)),
        Err(CommandError::NoPatientAssigned(_))
    ));
    assert!(matches!(
        clinic.delete_person(idx(2)),
        Err(CommandError::BlockedDeletion(_))
    ));

    clinic.assign(idx(1), idx(3)).unwrap();
    assert_eq!(
        clinic.roster().get(idx(1)).unwrap().display_tags(),
        vec!["Nurse Bob", "Nurse bob"]
    );

    let lower: Name = "bob".parse().unwrap();
    clinic.unassign(&lower, idx(1)).unwrap();
    assert_eq!(clinic.roster().get(idx(1)).unwrap().display_tags(), vec!["Nurse Bob"]);

    let rename = EditDescriptor {
        name: Some("Robert".parse().unwrap()),
        ..Default::default()
    };
    clinic.edit_person(idx(3), rename).unwrap();
    clinic.delete_person(idx(3)).unwrap();
    assert_eq!(clinic.roster().len(), 2);
}

#[test]
fn test_schedule_then_delete_round_trip() {
    let mut clinic = clinic();
    clinic.assign(idx(1), idx(2)).unwrap();
    let created = clinic
        .schedule(ScheduleAction::Add, idx(1), date("24/12/2025"), time("1630"))
        .unwrap();
    assert_eq!(created.warning, None);

    clinic.list(ListFilter::WithCheckups);
    assert_eq!(clinic.displayed_persons().len(), 1);

    let deleted = clinic
        .schedule(ScheduleAction::Delete, idx(1), date("24/12/2025"), time("1630"))
        .unwrap();
    assert!(deleted.message.contains("successfully deleted from 24/12/2025 at 16:30"));
}

fn assert_storage_round_trip(
    mut storage: Box<dyn RosterStorage>,
    reopen: impl Fn() -> Box<dyn RosterStorage>,
) {
    let mut clinic = clinic();
    clinic.assign(idx(1), idx(2)).unwrap();
    clinic
        .schedule(ScheduleAction::Add, idx(1), date("24/12/2025"), time("0900"))
        .unwrap();
    clinic
        .edit_person(
            idx(1),
            EditDescriptor {
                medical_history: Some([MedicalHistory::from_str("Asthma").unwrap()].into()),
                next_of_kin: Some("Jane 98887777".parse().unwrap()),
                ..Default::default()
            },
        )
        .unwrap();

    storage.save(clinic.roster().all()).unwrap();
    let loaded = reopen().load().unwrap().unwrap();
    assert_eq!(loaded.as_slice(), clinic.roster().all());
}

#[test]
fn test_json_round_trip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");
    let reopen_path = path.clone();
    assert_storage_round_trip(Box::new(JsonFileStorage::new(&path)), move || {
        Box::new(JsonFileStorage::new(&reopen_path))
    });
}

#[test]
fn test_sqlite_round_trip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let reopen_path = path.clone();
    assert_storage_round_trip(Box::new(SqliteStorage::open(&path).unwrap()), move || {
        Box::new(SqliteStorage::open(&reopen_path).unwrap())
    });
}
