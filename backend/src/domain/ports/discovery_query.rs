//! Driving port for reading the discovery ledger.

use async_trait::async_trait;

use crate::domain::{CityId, DiscoveryEvent, DiscoveryStats, Error, LandmarkId, UserId};

/// Driving port for discovery reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryQuery: Send + Sync {
    async fn has_discovered(
        &self,
        user_id: &UserId,
        landmark_id: &LandmarkId,
    ) -> Result<bool, Error>;

    /// Newest first, optionally restricted to landmarks of one city.
    async fn list_discoveries(
        &self,
        user_id: &UserId,
        city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, Error>;

    /// Lifetime totals; `not_found` when the user does not exist.
    async fn discovery_stats(&self, user_id: &UserId) -> Result<DiscoveryStats, Error>;
}

/// Fixture query describing an explorer with no discoveries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDiscoveryQuery;

#[async_trait]
impl DiscoveryQuery for FixtureDiscoveryQuery {
    async fn has_discovered(
        &self,
        _user_id: &UserId,
        _landmark_id: &LandmarkId,
    ) -> Result<bool, Error> {
        Ok(false)
    }

    async fn list_discoveries(
        &self,
        _user_id: &UserId,
        _city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, Error> {
        Ok(Vec::new())
    }

    async fn discovery_stats(&self, _user_id: &UserId) -> Result<DiscoveryStats, Error> {
        Ok(DiscoveryStats {
            total_discoveries: 0,
            total_xp: 0,
            level: 1,
        })
    }
}
