//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports backed by PostgreSQL through
//! `diesel-async` and `bb8` connection pooling. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) stay private to this module; adapters only
//! translate between rows and domain types.
//!
//! # Example
//!
//! ```ignore
//! use explorer::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/explorer")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
mod diesel_discovery_repository;
pub(crate) mod diesel_helpers;
mod diesel_progress_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_discovery_repository::DieselDiscoveryRepository;
pub use diesel_progress_repository::DieselProgressRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
