//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`*Command`, `*Query`) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_repository;
mod discovery_command;
mod discovery_query;
mod discovery_repository;
mod landmark_query;
mod progress_command;
mod progress_query;
mod progress_repository;
mod user_command;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{
    CatalogueRepository, CatalogueRepositoryError, FixtureCatalogueRepository, LandmarkFilter,
};
#[cfg(test)]
pub use discovery_command::MockDiscoveryCommand;
pub use discovery_command::{
    DiscoverNearbyRequest, DiscoveryCommand, FixtureDiscoveryCommand, RecordDiscoveryRequest,
};
#[cfg(test)]
pub use discovery_query::MockDiscoveryQuery;
pub use discovery_query::{DiscoveryQuery, FixtureDiscoveryQuery};
#[cfg(test)]
pub use discovery_repository::MockDiscoveryRepository;
pub use discovery_repository::{
    DiscoveryRepository, DiscoveryRepositoryError, FixtureDiscoveryRepository,
};
#[cfg(test)]
pub use landmark_query::MockLandmarkQuery;
pub use landmark_query::{
    DEFAULT_NEARBY_RADIUS_METERS, FixtureLandmarkQuery, LandmarkQuery, MAX_NEARBY_RADIUS_METERS,
    NearbyLandmarksRequest,
};
#[cfg(test)]
pub use progress_command::MockProgressCommand;
pub use progress_command::{FixtureProgressCommand, ProgressCommand};
#[cfg(test)]
pub use progress_query::MockProgressQuery;
pub use progress_query::{FixtureProgressQuery, ProgressQuery};
#[cfg(test)]
pub use progress_repository::MockProgressRepository;
pub use progress_repository::{
    FixtureProgressRepository, ProgressRepository, ProgressRepositoryError,
};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::{FixtureUserCommand, UserCommand};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::{FixtureUserQuery, UserQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
