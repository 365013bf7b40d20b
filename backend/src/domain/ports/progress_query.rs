//! Driving port for reading stored progress.

use async_trait::async_trait;

use crate::domain::{CityId, Error, ProgressRecord, Region, UserId};

/// Driving port for progress reads. Never recomputes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressQuery: Send + Sync {
    /// Stored records for the user, ordered by city id.
    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, Error>;

    /// Regions unlocked in the stored record; empty when none exists.
    async fn unlocked_regions(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<Vec<Region>, Error>;
}

/// Fixture query with no stored progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProgressQuery;

#[async_trait]
impl ProgressQuery for FixtureProgressQuery {
    async fn list_progress(&self, _user_id: &UserId) -> Result<Vec<ProgressRecord>, Error> {
        Ok(Vec::new())
    }

    async fn unlocked_regions(
        &self,
        _user_id: &UserId,
        _city_id: &CityId,
    ) -> Result<Vec<Region>, Error> {
        Ok(Vec::new())
    }
}
