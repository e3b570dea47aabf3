//! # shiftguard-entity
//!
//! Domain entity models for ShiftGuard. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod directory;
pub mod ledger;
pub mod period;
pub mod regulation;
pub mod violation;
