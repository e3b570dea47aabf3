//! Clock-event ledger entities.

pub mod chain;
pub mod model;

pub use chain::{ChainVerification, entry_hash, verify_chain};
pub use model::{ClockEventKind, CreateLedgerEntry, LedgerEntry};
