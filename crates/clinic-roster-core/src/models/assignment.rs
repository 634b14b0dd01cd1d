//! Nurse assignments held by a patient.
//!
//! The relation is keyed by nurse name and capped at
//! [`MAX_NURSES_PER_PATIENT`]. The `"Nurse <name>"` marker is only a rendering
//! of this set; it is produced for display and storage and parsed back only
//! when loading stored tags.

use std::collections::BTreeSet;

use super::{ModelError, ModelResult, Name};

/// Cardinality cap on nurses per patient.
pub const MAX_NURSES_PER_PATIENT: usize = 2;

/// Prefix of the marker text that encodes one assignment.
pub const NURSE_MARKER_PREFIX: &str = "Nurse ";

/// Render the marker for an assignment to `nurse`.
pub fn nurse_marker(nurse: &Name) -> String {
    format!("{}{}", NURSE_MARKER_PREFIX, nurse)
}

/// Extract the nurse name from a marker, if `text` is one.
pub fn parse_nurse_marker(text: &str) -> Option<&str> {
    text.strip_prefix(NURSE_MARKER_PREFIX)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// The set of nurses assigned to one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NurseAssignments {
    nurses: BTreeSet<Name>,
}

impl NurseAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored names, enforcing the cap and uniqueness.
    pub fn from_names<I>(names: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = Name>,
    {
        names
            .into_iter()
            .try_fold(Self::new(), |acc, name| acc.with_nurse(name))
    }

    pub fn len(&self) -> usize {
        self.nurses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nurses.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.nurses.len() >= MAX_NURSES_PER_PATIENT
    }

    /// Whether exactly `nurse` is assigned.
    pub fn contains(&self, nurse: &Name) -> bool {
        self.nurses.contains(nurse)
    }

    /// The stored name matching typed input `nurse`. An exact match wins over
    /// a case-insensitive one.
    pub fn find(&self, nurse: &str) -> Option<&Name> {
        self.nurses
            .iter()
            .find(|n| n.as_str() == nurse.trim())
            .or_else(|| self.nurses.iter().find(|n| n.matches(nurse)))
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.nurses.iter()
    }

    /// Marker strings, one per assignment.
    pub fn markers(&self) -> impl Iterator<Item = String> + '_ {
        self.nurses.iter().map(nurse_marker)
    }

    /// Return a copy with `nurse` added.
    pub fn with_nurse(&self, nurse: Name) -> ModelResult<Self> {
        if self.is_full() {
            return Err(ModelError::TooManyNurses {
                max: MAX_NURSES_PER_PATIENT,
            });
        }
        if self.contains(&nurse) {
            return Err(ModelError::NurseAlreadyAssigned(nurse.to_string()));
        }

        let mut nurses = self.nurses.clone();
        nurses.insert(nurse);
        Ok(Self { nurses })
    }

    /// Return a copy without `nurse`, or `None` if it was not assigned.
    pub fn without_nurse(&self, nurse: &str) -> Option<Self> {
        let existing = self.find(nurse)?.clone();
        let mut nurses = self.nurses.clone();
        nurses.remove(&existing);
        Some(Self { nurses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn test_marker_round_trip() {
        let bob = name("Bob");
        assert_eq!(nurse_marker(&bob), "Nurse Bob");
        assert_eq!(parse_nurse_marker("Nurse Bob"), Some("Bob"));
        assert_eq!(parse_nurse_marker("Nurse "), None);
        assert_eq!(parse_nurse_marker("friends"), None);
    }

    #[test]
    fn test_cap_is_two() {
        let assignments = NurseAssignments::new()
            .with_nurse(name("Bob"))
            .unwrap()
            .with_nurse(name("Carol"))
            .unwrap();
        assert!(assignments.is_full());
        assert_eq!(
            assignments.with_nurse(name("Dave")),
            Err(ModelError::TooManyNurses { max: 2 })
        );
    }

    #[test]
    fn test_duplicate_nurse_rejected() {
        let assignments = NurseAssignments::new().with_nurse(name("Bob")).unwrap();
        assert!(matches!(
            assignments.with_nurse(name("Bob")),
            Err(ModelError::NurseAlreadyAssigned(_))
        ));
    }

    #[test]
    fn test_names_differing_in_case_are_distinct_nurses() {
        let assignments = NurseAssignments::new().with_nurse(name("Bob")).unwrap();
        assert!(assignments.contains(&name("Bob")));
        assert!(!assignments.contains(&name("bob")));

        let both = assignments.with_nurse(name("bob")).unwrap();
        assert_eq!(both.len(), 2);
        let left = both.without_nurse("bob").unwrap();
        assert_eq!(left.names().collect::<Vec<_>>(), vec![&name("Bob")]);
    }

    #[test]
    fn test_without_nurse() {
        let assignments = NurseAssignments::new().with_nurse(name("Bob")).unwrap();
        let removed = assignments.without_nurse("bob").unwrap();
        assert!(removed.is_empty());
        assert!(assignments.without_nurse("Carol").is_none());
    }

    #[test]
    fn test_from_names_enforces_cap() {
        let result = NurseAssignments::from_names(vec![name("A"), name("B"), name("C")]);
        assert!(result.is_err());
    }
}
