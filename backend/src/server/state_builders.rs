//! Builders choosing the driven adapters behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use explorer::domain::DiscoverySettings;
use explorer::inbound::http::state::{HttpState, Repositories};
use explorer::outbound::memory::InMemoryStore;
use explorer::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselDiscoveryRepository, DieselProgressRepository,
    DieselUserRepository, MigrationError, PoolConfig, PoolError, run_pending_migrations,
};

/// Failures while preparing the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Which store the handlers run against.
pub enum Storage {
    Postgres(PoolConfig),
    Memory { seed_example_data: bool },
}

fn memory_store(seed_example_data: bool) -> InMemoryStore {
    if seed_example_data {
        InMemoryStore::with_example_data()
    } else {
        InMemoryStore::new()
    }
}

fn memory_state(
    seed_example_data: bool,
    clock: Arc<dyn Clock>,
    settings: DiscoverySettings,
) -> HttpState {
    let store = Arc::new(memory_store(seed_example_data));
    HttpState::from_repositories(
        Repositories {
            catalogue: Arc::clone(&store),
            users: Arc::clone(&store),
            discoveries: Arc::clone(&store),
            progress: store,
        },
        clock,
        settings,
    )
}

async fn postgres_state(
    config: PoolConfig,
    clock: Arc<dyn Clock>,
    settings: DiscoverySettings,
) -> Result<HttpState, StorageError> {
    run_pending_migrations(config.database_url()).await?;
    let pool = DbPool::new(config).await?;
    Ok(HttpState::from_repositories(
        Repositories {
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            discoveries: Arc::new(DieselDiscoveryRepository::new(pool.clone())),
            progress: Arc::new(DieselProgressRepository::new(pool)),
        },
        clock,
        settings,
    ))
}

/// Wire the services over the selected storage using the system clock.
///
/// # Errors
///
/// Returns [`StorageError`] when migrations fail or the pool cannot be built.
pub async fn build_http_state(
    storage: Storage,
    settings: DiscoverySettings,
) -> Result<HttpState, StorageError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match storage {
        Storage::Postgres(config) => {
            info!(database = %config.redacted_url(), "using PostgreSQL storage");
            postgres_state(config, clock, settings).await
        }
        Storage::Memory { seed_example_data } => {
            info!(seed_example_data, "using in-memory storage");
            Ok(memory_state(seed_example_data, clock, settings))
        }
    }
}
