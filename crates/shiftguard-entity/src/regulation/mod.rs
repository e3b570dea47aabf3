//! Labor-time regulation entities.

pub mod assignment;
pub mod model;

pub use assignment::{RegulationAssignment, RegulationScope, ScopeKind};
pub use model::{BreakOption, BreakRule, Regulation};
