//! Driving port for recording discoveries.
//!
//! Recording is idempotent per (user, landmark): repeating a discovery
//! returns the stored event and awards nothing.

use async_trait::async_trait;

use crate::domain::{
    CityId, DiscoveryEvent, DiscoveryId, DiscoveryMethod, DiscoveryOutcome, Error, GeoPoint,
    LandmarkId, NearbyDiscovery, User, UserId, Username,
};

/// Explicit discovery of one landmark.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDiscoveryRequest {
    pub user_id: UserId,
    pub landmark_id: LandmarkId,
    pub method: DiscoveryMethod,
    pub reported_location: Option<GeoPoint>,
    /// Replaces the category award when present.
    pub xp_override: Option<u64>,
}

/// GPS-triggered discovery of everything in range of `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoverNearbyRequest {
    pub user_id: UserId,
    pub origin: GeoPoint,
    pub city_id: Option<CityId>,
}

/// Driving port for discovery writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryCommand: Send + Sync {
    /// Record a discovery, or replay the stored one for a known pair.
    ///
    /// Fails with `not_found` when the user or landmark does not exist.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use explorer::domain::{DiscoveryMethod, LandmarkId, UserId};
    /// # use explorer::domain::ports::{DiscoveryCommand, FixtureDiscoveryCommand, RecordDiscoveryRequest};
    /// # async fn example() -> Result<(), explorer::domain::Error> {
    /// let outcome = FixtureDiscoveryCommand
    ///     .record_discovery(RecordDiscoveryRequest {
    ///         user_id: UserId::random(),
    ///         landmark_id: LandmarkId::random(),
    ///         method: DiscoveryMethod::Manual,
    ///         reported_location: None,
    ///         xp_override: Some(25),
    ///     })
    ///     .await?;
    /// assert_eq!(outcome.xp_awarded(), 25);
    /// # Ok(())
    /// # }
    /// ```
    async fn record_discovery(
        &self,
        request: RecordDiscoveryRequest,
    ) -> Result<DiscoveryOutcome, Error>;

    /// Record every landmark whose own discovery radius covers `origin`.
    ///
    /// Outcomes are ordered by ascending distance.
    async fn discover_nearby(
        &self,
        request: DiscoverNearbyRequest,
    ) -> Result<Vec<NearbyDiscovery>, Error>;
}

/// Fixture command that records every request as new.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDiscoveryCommand;

#[async_trait]
impl DiscoveryCommand for FixtureDiscoveryCommand {
    async fn record_discovery(
        &self,
        request: RecordDiscoveryRequest,
    ) -> Result<DiscoveryOutcome, Error> {
        let now = chrono::Utc::now();
        let xp_earned = request.xp_override.unwrap_or_default();
        let username = Username::new("fixture_explorer")
            .map_err(|err| Error::internal(format!("fixture username rejected: {err}")))?;
        Ok(DiscoveryOutcome {
            event: DiscoveryEvent {
                id: DiscoveryId::random(),
                user_id: request.user_id,
                landmark_id: request.landmark_id,
                method: request.method,
                discovered_at: now,
                reported_location: request.reported_location,
                xp_earned,
            },
            newly_recorded: true,
            user: User::register(request.user_id, username, now).with_xp_added(xp_earned),
        })
    }

    async fn discover_nearby(
        &self,
        _request: DiscoverNearbyRequest,
    ) -> Result<Vec<NearbyDiscovery>, Error> {
        Ok(Vec::new())
    }
}
