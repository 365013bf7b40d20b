//! Discovery ledger service.
//!
//! Records (user, landmark) discoveries exactly once, awards experience from
//! the [`ExperienceTable`], and refreshes the affected city's progress. The
//! store writes an event and its award as one unit. A duplicate insert
//! reported by the store is treated the same as finding an existing event,
//! so concurrent retries award experience once.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CatalogueRepository, DiscoverNearbyRequest, DiscoveryCommand, DiscoveryQuery,
    DiscoveryRepository, DiscoveryRepositoryError, ProgressCommand, RecordDiscoveryRequest,
    UserRepository,
};
use crate::domain::service_errors::{map_catalogue_error, map_discovery_error, map_user_error};
use crate::domain::{
    CityId, DEFAULT_DISCOVERY_RADIUS_METERS, DiscoveryEvent, DiscoveryId, DiscoveryMethod,
    DiscoveryOutcome, DiscoveryStats, Error, ExperienceTable, Landmark, LandmarkId,
    NearbyDiscovery, User, UserId, find_nearby,
};

/// Cap on the prefilter radius used by GPS discovery.
pub const DEFAULT_MAX_GPS_DISCOVERY_RADIUS_METERS: f64 = 200.0;

/// Tunables for the discovery ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoverySettings {
    pub experience: ExperienceTable,
    pub max_gps_radius_meters: f64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            experience: ExperienceTable::default(),
            max_gps_radius_meters: DEFAULT_MAX_GPS_DISCOVERY_RADIUS_METERS,
        }
    }
}

/// Discovery service implementing the discovery driving ports.
#[derive(Clone)]
pub struct DiscoveryService<C, U, D, P> {
    catalogue: Arc<C>,
    users: Arc<U>,
    discoveries: Arc<D>,
    progress: Arc<P>,
    clock: Arc<dyn Clock>,
    settings: DiscoverySettings,
}

impl<C, U, D, P> DiscoveryService<C, U, D, P> {
    /// Create the service with its collaborators.
    pub fn new(
        catalogue: Arc<C>,
        users: Arc<U>,
        discoveries: Arc<D>,
        progress: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalogue,
            users,
            discoveries,
            progress,
            clock,
            settings: DiscoverySettings::default(),
        }
    }

    /// Replace the default settings.
    pub fn with_settings(mut self, settings: DiscoverySettings) -> Self {
        self.settings = settings;
        self
    }
}

impl<C, U, D, P> DiscoveryService<C, U, D, P>
where
    C: CatalogueRepository,
    U: UserRepository,
    D: DiscoveryRepository,
    P: ProgressCommand,
{
    async fn require_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn require_landmark(&self, landmark_id: &LandmarkId) -> Result<Landmark, Error> {
        self.catalogue
            .get_landmark(landmark_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("landmark {landmark_id} not found")))
    }

    async fn stored_event(
        &self,
        user_id: &UserId,
        landmark_id: &LandmarkId,
    ) -> Result<DiscoveryEvent, Error> {
        self.discoveries
            .find(user_id, landmark_id)
            .await
            .map_err(map_discovery_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "discovery for user {user_id} and landmark {landmark_id} vanished after conflict"
                ))
            })
    }

    /// Return the stored event unchanged.
    ///
    /// Progress is recomputed here too, so a retry after a failed refresh
    /// still leaves the city's record current.
    async fn replay(
        &self,
        event: DiscoveryEvent,
        city_id: &CityId,
    ) -> Result<DiscoveryOutcome, Error> {
        let user = self.require_user(&event.user_id).await?;
        self.progress.refresh(&event.user_id, city_id).await?;
        debug!(
            user_id = %event.user_id,
            landmark_id = %event.landmark_id,
            replayed = true,
            "discovery already recorded"
        );
        Ok(DiscoveryOutcome {
            event,
            newly_recorded: false,
            user,
        })
    }

    async fn record_for_landmark(
        &self,
        request: RecordDiscoveryRequest,
        landmark: &Landmark,
    ) -> Result<DiscoveryOutcome, Error> {
        if let Some(existing) = self
            .discoveries
            .find(&request.user_id, &request.landmark_id)
            .await
            .map_err(map_discovery_error)?
        {
            return self.replay(existing, &landmark.city_id).await;
        }

        let xp_earned = request
            .xp_override
            .unwrap_or_else(|| self.settings.experience.award_for(&landmark.category));
        let event = DiscoveryEvent {
            id: DiscoveryId::random(),
            user_id: request.user_id,
            landmark_id: request.landmark_id,
            method: request.method,
            discovered_at: self.clock.utc(),
            reported_location: request.reported_location,
            xp_earned,
        };

        let user = match self.discoveries.insert_and_award(&event).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(Error::not_found(format!("user {} not found", event.user_id))),
            Err(DiscoveryRepositoryError::Conflict { .. }) => {
                let existing = self
                    .stored_event(&request.user_id, &request.landmark_id)
                    .await?;
                return self.replay(existing, &landmark.city_id).await;
            }
            Err(other) => return Err(map_discovery_error(other)),
        };

        self.progress
            .refresh(&event.user_id, &landmark.city_id)
            .await?;

        info!(
            user_id = %event.user_id,
            landmark_id = %event.landmark_id,
            city_id = %landmark.city_id,
            method = %event.method,
            xp_earned,
            total_xp = user.total_xp,
            level = user.level,
            replayed = false,
            "discovery recorded"
        );

        Ok(DiscoveryOutcome {
            event,
            newly_recorded: true,
            user,
        })
    }

    async fn prefilter_radius(&self) -> Result<f64, Error> {
        let largest = self
            .catalogue
            .max_discovery_radius()
            .await
            .map_err(map_catalogue_error)?
            .map_or(DEFAULT_DISCOVERY_RADIUS_METERS, |radius| radius.meters());
        Ok(f64::from(largest).min(self.settings.max_gps_radius_meters))
    }
}

#[async_trait]
impl<C, U, D, P> DiscoveryCommand for DiscoveryService<C, U, D, P>
where
    C: CatalogueRepository,
    U: UserRepository,
    D: DiscoveryRepository,
    P: ProgressCommand,
{
    async fn record_discovery(
        &self,
        request: RecordDiscoveryRequest,
    ) -> Result<DiscoveryOutcome, Error> {
        self.require_user(&request.user_id).await?;
        let landmark = self.require_landmark(&request.landmark_id).await?;
        self.record_for_landmark(request, &landmark).await
    }

    async fn discover_nearby(
        &self,
        request: DiscoverNearbyRequest,
    ) -> Result<Vec<NearbyDiscovery>, Error> {
        self.require_user(&request.user_id).await?;
        let radius = self.prefilter_radius().await?;
        let candidates = self
            .catalogue
            .list_landmarks_near(request.origin, radius, request.city_id)
            .await
            .map_err(map_catalogue_error)?;

        let in_range = find_nearby(request.origin, radius, candidates)
            .into_iter()
            .filter(|nearby| {
                nearby.distance_meters <= f64::from(nearby.landmark.discovery_radius.meters())
            });

        let mut discovered = Vec::new();
        for nearby in in_range {
            let outcome = self
                .record_for_landmark(
                    RecordDiscoveryRequest {
                        user_id: request.user_id,
                        landmark_id: nearby.landmark.id,
                        method: DiscoveryMethod::Gps,
                        reported_location: Some(request.origin),
                        xp_override: None,
                    },
                    &nearby.landmark,
                )
                .await?;
            discovered.push(NearbyDiscovery {
                outcome,
                distance_meters: nearby.distance_meters,
            });
        }

        debug!(
            user_id = %request.user_id,
            radius_meters = radius,
            matched = discovered.len(),
            "gps discovery evaluated"
        );
        Ok(discovered)
    }
}

#[async_trait]
impl<C, U, D, P> DiscoveryQuery for DiscoveryService<C, U, D, P>
where
    C: CatalogueRepository,
    U: UserRepository,
    D: DiscoveryRepository,
    P: ProgressCommand,
{
    async fn has_discovered(
        &self,
        user_id: &UserId,
        landmark_id: &LandmarkId,
    ) -> Result<bool, Error> {
        let found = self
            .discoveries
            .find(user_id, landmark_id)
            .await
            .map_err(map_discovery_error)?;
        Ok(found.is_some())
    }

    async fn list_discoveries(
        &self,
        user_id: &UserId,
        city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, Error> {
        self.discoveries
            .list_for_user(user_id, city_id)
            .await
            .map_err(map_discovery_error)
    }

    async fn discovery_stats(&self, user_id: &UserId) -> Result<DiscoveryStats, Error> {
        let user = self.require_user(user_id).await?;
        let total_discoveries = self
            .discoveries
            .count_for_user(user_id)
            .await
            .map_err(map_discovery_error)?;
        Ok(DiscoveryStats {
            total_discoveries,
            total_xp: user.total_xp,
            level: user.level,
        })
    }
}

#[cfg(test)]
#[path = "discovery_service_tests.rs"]
mod tests;
