//! # shiftguard-compliance
//!
//! The time-compliance enforcement engine:
//!
//! - [`resolver`] — walks the employee → team → organization assignment
//!   hierarchy to find the single effective regulation.
//! - [`deficit`] — pure break-deficit arithmetic over a regulation's rules.
//! - [`checker`] — evaluates a session against daily/weekly/uninterrupted
//!   caps and the break deficit, recording hard violations.
//! - [`enforcement`] — splits a closed work period to carve out a compliant
//!   break, atomically and idempotently.
//! - [`safety_net`] — the scheduled corrective pass over periods the
//!   synchronous path missed.
//! - [`timeclock`] — clock-in/clock-out capture feeding the ledger and
//!   work period records.

pub mod calendar;
pub mod checker;
pub mod deficit;
pub mod enforcement;
pub mod resolver;
pub mod safety_net;
pub mod timeclock;

use uuid::Uuid;

/// Actor recorded on rows written by the engine itself rather than a person.
pub const SYSTEM_ACTOR: Uuid = Uuid::nil();
