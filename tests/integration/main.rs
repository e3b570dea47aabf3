//! Database-backed integration tests.
//!
//! These tests need a running PostgreSQL instance and are skipped unless
//! `SHIFTGUARD_TEST_DATABASE_URL` is set.

mod helpers;

mod enforcement_test;
mod safety_net_test;
