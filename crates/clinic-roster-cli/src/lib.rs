//! Clinic Roster command line
//!
//! Line grammar ([`parser`]) and the interactive session that runs parsed
//! commands against a [`clinic_roster_core::ClinicRoster`] ([`session`]).

pub mod parser;
pub mod session;

pub use parser::{parse_command, Command, ParseError, ParseResult, HELP_MESSAGE};
pub use session::{Reply, Session};
