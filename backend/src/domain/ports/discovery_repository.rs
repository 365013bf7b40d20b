//! Driven port for the discovery event store.

use async_trait::async_trait;

use crate::domain::{CityId, DiscoveryEvent, LandmarkId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by discovery repository adapters.
    pub enum DiscoveryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "discovery repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "discovery repository query failed: {message}",
        /// An event already exists for the (user, landmark) pair.
        Conflict { message: String } =>
            "discovery already recorded: {message}",
    }
}

/// Port for the append-only discovery ledger.
///
/// Adapters must enforce uniqueness of (user, landmark) so concurrent
/// duplicate inserts yield exactly one stored event, and must store an
/// event together with its experience award or not at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &UserId,
        landmark_id: &LandmarkId,
    ) -> Result<Option<DiscoveryEvent>, DiscoveryRepositoryError>;

    /// Persist a new event and add its `xp_earned` to the owner's total as
    /// one unit, returning the updated user.
    ///
    /// Fails with `Conflict` when the pair exists. Returns `None`, storing
    /// nothing, when the user does not exist.
    async fn insert_and_award(
        &self,
        event: &DiscoveryEvent,
    ) -> Result<Option<User>, DiscoveryRepositoryError>;

    /// Number of events for `user_id` whose landmark belongs to `city_id`.
    async fn count_for_city(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<u64, DiscoveryRepositoryError>;

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, DiscoveryRepositoryError>;

    /// Events for `user_id`, newest first, optionally limited to one city.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, DiscoveryRepositoryError>;
}

/// Fixture implementation describing an empty ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDiscoveryRepository;

#[async_trait]
impl DiscoveryRepository for FixtureDiscoveryRepository {
    async fn find(
        &self,
        _user_id: &UserId,
        _landmark_id: &LandmarkId,
    ) -> Result<Option<DiscoveryEvent>, DiscoveryRepositoryError> {
        Ok(None)
    }

    async fn insert_and_award(
        &self,
        _event: &DiscoveryEvent,
    ) -> Result<Option<User>, DiscoveryRepositoryError> {
        Ok(None)
    }

    async fn count_for_city(
        &self,
        _user_id: &UserId,
        _city_id: &CityId,
    ) -> Result<u64, DiscoveryRepositoryError> {
        Ok(0)
    }

    async fn count_for_user(&self, _user_id: &UserId) -> Result<u64, DiscoveryRepositoryError> {
        Ok(0)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
        _city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, DiscoveryRepositoryError> {
        Ok(Vec::new())
    }
}
