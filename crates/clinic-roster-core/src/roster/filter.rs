//! List filters for the roster's displayed view.

use std::fmt;

use crate::models::{Person, Role};

/// Which records the filtered view shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Role(Role),
    /// Records with at least one checkup, ordered by earliest checkup.
    WithCheckups,
    /// Records whose name contains any keyword as a whole word, ignoring case.
    NameKeywords(Vec<String>),
}

impl ListFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Role(role) => person.role() == *role,
            ListFilter::WithCheckups => person.has_checkups(),
            ListFilter::NameKeywords(keywords) => person
                .name()
                .as_str()
                .split_whitespace()
                .any(|word| keywords.iter().any(|k| k.eq_ignore_ascii_case(word))),
        }
    }

    /// Apply the filter to `persons`, keeping roster order except for
    /// `WithCheckups`.
    pub fn apply<'a>(&self, persons: &'a [Person]) -> Vec<&'a Person> {
        let mut view: Vec<&Person> = persons.iter().filter(|p| self.matches(p)).collect();
        if matches!(self, ListFilter::WithCheckups) {
            // Stable sort keeps roster order for equal earliest checkups.
            view.sort_by_key(|p| p.earliest_checkup().copied());
        }
        view
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListFilter::All => f.write_str("all"),
            ListFilter::Role(role) => write!(f, "{}", role.as_str().to_lowercase()),
            ListFilter::WithCheckups => f.write_str("checkup"),
            ListFilter::NameKeywords(keywords) => write!(f, "name: {}", keywords.join(" ")),
        }
    }
}
