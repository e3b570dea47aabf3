//! Organization directory entities (employees, teams, organizations).

pub mod model;

pub use model::{Employee, Organization, Team};
