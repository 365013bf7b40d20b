//! Progress aggregator service.
//!
//! Stored progress records are caches. `refresh` rebuilds one from the
//! discovery ledger and the catalogue every time; nothing adjusts counters
//! in place.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    CatalogueRepository, DiscoveryRepository, ProgressCommand, ProgressQuery, ProgressRepository,
    UserRepository,
};
use crate::domain::service_errors::{
    map_catalogue_error, map_discovery_error, map_progress_error, map_user_error,
};
use crate::domain::{
    CityId, Error, ProgressInputs, ProgressRecord, Region, UserId, compute_progress,
};

/// Progress service implementing the progress driving ports.
#[derive(Clone)]
pub struct ProgressService<C, U, D, R> {
    catalogue: Arc<C>,
    users: Arc<U>,
    discoveries: Arc<D>,
    progress: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<C, U, D, R> ProgressService<C, U, D, R> {
    /// Create the service with its collaborators.
    pub fn new(
        catalogue: Arc<C>,
        users: Arc<U>,
        discoveries: Arc<D>,
        progress: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalogue,
            users,
            discoveries,
            progress,
            clock,
        }
    }
}

impl<C, U, D, R> ProgressService<C, U, D, R>
where
    C: CatalogueRepository,
    U: UserRepository,
    D: DiscoveryRepository,
    R: ProgressRepository,
{
    async fn require_user_and_city(&self, user_id: &UserId, city_id: &CityId) -> Result<(), Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        self.catalogue
            .get_city(city_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("city {city_id} not found")))?;
        Ok(())
    }
}

#[async_trait]
impl<C, U, D, R> ProgressCommand for ProgressService<C, U, D, R>
where
    C: CatalogueRepository,
    U: UserRepository,
    D: DiscoveryRepository,
    R: ProgressRepository,
{
    async fn get_or_create(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<ProgressRecord, Error> {
        self.require_user_and_city(user_id, city_id).await?;
        if let Some(existing) = self
            .progress
            .find(user_id, city_id)
            .await
            .map_err(map_progress_error)?
        {
            return Ok(existing);
        }

        let total_landmarks = self
            .catalogue
            .count_landmarks(city_id)
            .await
            .map_err(map_catalogue_error)?;
        let initial = ProgressRecord::initial(*user_id, *city_id, total_landmarks, self.clock.utc());
        self.progress
            .create_if_absent(&initial)
            .await
            .map_err(map_progress_error)
    }

    async fn refresh(&self, user_id: &UserId, city_id: &CityId) -> Result<ProgressRecord, Error> {
        self.require_user_and_city(user_id, city_id).await?;
        let previous = self
            .progress
            .find(user_id, city_id)
            .await
            .map_err(map_progress_error)?;
        let total_landmarks = self
            .catalogue
            .count_landmarks(city_id)
            .await
            .map_err(map_catalogue_error)?;
        let landmarks_discovered = self
            .discoveries
            .count_for_city(user_id, city_id)
            .await
            .map_err(map_discovery_error)?;
        let regions = self
            .catalogue
            .list_regions(city_id)
            .await
            .map_err(map_catalogue_error)?;

        let record = compute_progress(
            *user_id,
            *city_id,
            previous.as_ref(),
            ProgressInputs {
                landmarks_discovered,
                total_landmarks,
                regions: &regions,
                computed_at: self.clock.utc(),
            },
        );
        self.progress
            .save(&record)
            .await
            .map_err(map_progress_error)?;

        debug!(
            user_id = %user_id,
            city_id = %city_id,
            landmarks_discovered,
            total_landmarks,
            unlocked_regions = record.unlocked_region_ids.len(),
            "progress refreshed"
        );
        Ok(record)
    }
}

#[async_trait]
impl<C, U, D, R> ProgressQuery for ProgressService<C, U, D, R>
where
    C: CatalogueRepository,
    U: UserRepository,
    D: DiscoveryRepository,
    R: ProgressRepository,
{
    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, Error> {
        self.progress
            .list_for_user(user_id)
            .await
            .map_err(map_progress_error)
    }

    async fn unlocked_regions(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<Vec<Region>, Error> {
        let Some(record) = self
            .progress
            .find(user_id, city_id)
            .await
            .map_err(map_progress_error)?
        else {
            return Ok(Vec::new());
        };

        let regions = self
            .catalogue
            .list_regions(city_id)
            .await
            .map_err(map_catalogue_error)?;
        Ok(regions
            .into_iter()
            .filter(|region| record.unlocked_region_ids.contains(&region.id))
            .collect())
    }
}

#[cfg(test)]
#[path = "progress_service_tests.rs"]
mod tests;
