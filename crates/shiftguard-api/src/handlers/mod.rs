//! HTTP request handlers.

pub mod compliance;
pub mod enforcement;
pub mod health;
pub mod ledger;
pub mod timeclock;
pub mod violations;
