//! Work period entities.

pub mod model;

pub use model::{OpenWorkPeriod, WorkPeriod};
