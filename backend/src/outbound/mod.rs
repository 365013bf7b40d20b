//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: single-process store used for tests and database-less runs
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;
