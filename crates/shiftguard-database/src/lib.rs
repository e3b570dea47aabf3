//! # shiftguard-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations for ShiftGuard. Repositories are thin structs around a
//! `PgPool`; the engine's transactional operations use the `*_with`
//! variants that take a `&mut PgConnection` so several writes can share
//! one transaction.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
