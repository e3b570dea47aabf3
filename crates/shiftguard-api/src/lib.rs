//! # shiftguard-api
//!
//! Internal HTTP surface for ShiftGuard. The engine has no public protocol
//! of its own; these routes are the service boundary used by the platform's
//! clock-event capture and by operations tooling (safety-net trigger,
//! ledger verification).

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
