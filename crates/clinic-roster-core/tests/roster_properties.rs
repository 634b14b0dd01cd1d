//! Property tests for assignment cardinality, checkup separation and
//! assign/unassign symmetry.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;

use clinic_roster_core::models::{BloodType, MIN_SEPARATION_SECS};
use clinic_roster_core::{
    ClinicRoster, CommandError, FixedClock, Index, Person, Role, Roster, ScheduleAction,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const PATIENTS: usize = 2;
const NURSES: usize = 4;

fn person(name: &str, phone: &str, role: Role) -> Person {
    Person::builder(
        name.parse().unwrap(),
        "01/01/1980".parse().unwrap(),
        phone.parse().unwrap(),
        "Blk 1 Toa Payoh".parse().unwrap(),
        BloodType::OPositive,
        role,
    )
    .build()
    .unwrap()
}

/// Patients at 1..=2, nurses at 3..=6.
fn clinic() -> ClinicRoster {
    let mut roster = Roster::new();
    roster.add(person("Patient A", "81000001", Role::Patient)).unwrap();
    roster.add(person("Patient B", "81000002", Role::Patient)).unwrap();
    for (i, name) in ["Nurse A", "Nurse B", "Nurse C", "Nurse D"].iter().enumerate() {
        roster
            .add(person(name, &format!("9100000{}", i), Role::Nurse))
            .unwrap();
    }
    let now = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    ClinicRoster::in_memory(roster, Box::new(FixedClock(now)))
}

fn idx(n: usize) -> Index {
    Index::new(n).unwrap()
}

fn checkup_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()
}

/// A slot `minutes` after opening (09:00), within business hours.
fn slot(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap() + Duration::minutes(minutes as i64)
}

fn at(minutes: u32) -> NaiveDateTime {
    checkup_day().and_time(slot(minutes))
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    /// No sequence of assign commands gives a patient more than two nurses,
    /// and a rejected assign leaves the roster untouched.
    #[test]
    fn prop_at_most_two_nurses(
        ops in prop::collection::vec((1usize..=PATIENTS, 1usize..=NURSES), 0..20)
    ) {
        let mut clinic = clinic();
        for (patient, nurse) in ops {
            let before: Vec<Person> = clinic.roster().all().to_vec();
            let result = clinic.assign(idx(patient), idx(PATIENTS + nurse));
            if result.is_err() {
                prop_assert_eq!(clinic.roster().all(), before.as_slice());
            }
            for p in clinic.roster().all() {
                prop_assert!(p.assignments().len() <= 2);
            }
        }
    }

    /// Accepted checkups are always at least 30 minutes apart.
    #[test]
    fn prop_checkups_separated(slots in prop::collection::vec(0u32..=480, 1..15)) {
        let mut clinic = clinic();
        for minutes in slots {
            let _ = clinic.schedule(ScheduleAction::Add, idx(1), checkup_day(), slot(minutes));
        }

        let checkups: Vec<NaiveDateTime> = clinic
            .roster()
            .get(idx(1))
            .unwrap()
            .checkups()
            .iter()
            .map(|c| c.datetime())
            .collect();
        for pair in checkups.windows(2) {
            prop_assert!((pair[1] - pair[0]).num_seconds() >= MIN_SEPARATION_SECS);
        }
    }

    /// Whether two checkups can coexist does not depend on insertion order.
    #[test]
    fn prop_separation_is_order_independent(a in 0u32..=480, b in 0u32..=480) {
        let mut forward = clinic();
        let mut backward = clinic();

        for m in [a, b] {
            let _ = forward.schedule(ScheduleAction::Add, idx(1), checkup_day(), slot(m));
        }
        for m in [b, a] {
            let _ = backward.schedule(ScheduleAction::Add, idx(1), checkup_day(), slot(m));
        }

        let count = |clinic: &ClinicRoster| clinic.roster().get(idx(1)).unwrap().checkups().len();
        let apart = (at(a) - at(b)).num_seconds().abs() >= MIN_SEPARATION_SECS;
        prop_assert_eq!(count(&forward), if apart { 2 } else { 1 });
        prop_assert_eq!(count(&backward), count(&forward));
    }

    /// Assigning a fresh nurse and then removing it restores the patient.
    #[test]
    fn prop_assign_then_unassign_restores(pre in 0usize..=1, nurse in 1usize..=NURSES) {
        let mut clinic = clinic();
        if pre == 1 && nurse != 1 {
            clinic.assign(idx(1), idx(PATIENTS + 1)).unwrap();
        }
        let before = clinic.roster().get(idx(1)).unwrap().clone();

        clinic.assign(idx(1), idx(PATIENTS + nurse)).unwrap();
        let nurse_name = clinic.roster().get(idx(PATIENTS + nurse)).unwrap().name().clone();
        clinic.unassign(&nurse_name, idx(1)).unwrap();

        prop_assert_eq!(clinic.roster().get(idx(1)).unwrap(), &before);
    }
}

#[test]
fn test_rejected_assign_reports_index() {
    let mut clinic = clinic();
    let err = clinic.assign(idx(3), idx(4)).unwrap_err();
    assert!(matches!(err, CommandError::InvalidPatient(i) if i == idx(3)));
    assert_eq!(err.to_string(), "The person at index 3 is not a patient.");
}
