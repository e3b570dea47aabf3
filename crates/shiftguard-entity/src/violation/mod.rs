//! Compliance violation entities.

pub mod model;

pub use model::{ComplianceViolation, CreateViolation, ViolationKind};
