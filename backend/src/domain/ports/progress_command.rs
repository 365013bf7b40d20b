//! Driving port for initialising and recomputing progress records.

use async_trait::async_trait;

use crate::domain::{CityId, Error, ProgressRecord, UserId};

/// Driving port for progress writes.
///
/// Both operations fail with `not_found` when the user or city does not
/// exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressCommand: Send + Sync {
    /// Return the stored record, or store and return an initial one.
    async fn get_or_create(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<ProgressRecord, Error>;

    /// Recompute the record from the ledger and catalogue and store it.
    ///
    /// Safe to run redundantly and concurrently for the same pair.
    async fn refresh(&self, user_id: &UserId, city_id: &CityId) -> Result<ProgressRecord, Error>;
}

/// Fixture command returning empty, never-refreshed records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProgressCommand;

#[async_trait]
impl ProgressCommand for FixtureProgressCommand {
    async fn get_or_create(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<ProgressRecord, Error> {
        Ok(ProgressRecord::initial(
            *user_id,
            *city_id,
            0,
            chrono::Utc::now(),
        ))
    }

    async fn refresh(&self, user_id: &UserId, city_id: &CityId) -> Result<ProgressRecord, Error> {
        self.get_or_create(user_id, city_id).await
    }
}
