//! Background scheduling for ShiftGuard.
//!
//! This crate provides the cron scheduler that runs the safety-net
//! enforcement pass on a configurable interval.

pub mod scheduler;

pub use scheduler::CronScheduler;
