//! Driving port for catalogue reads and nearby search.

use async_trait::async_trait;

use crate::domain::{CityId, Error, GeoPoint, Landmark, LandmarkId, NearbyLandmark};

use super::LandmarkFilter;

/// Radius used when a nearby search does not name one.
pub const DEFAULT_NEARBY_RADIUS_METERS: f64 = 100.0;
/// Largest radius accepted by a nearby search.
pub const MAX_NEARBY_RADIUS_METERS: f64 = 50_000.0;

/// Nearby landmark search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyLandmarksRequest {
    pub origin: GeoPoint,
    /// Defaults to [`DEFAULT_NEARBY_RADIUS_METERS`].
    pub radius_meters: Option<f64>,
    pub city_id: Option<CityId>,
}

/// Driving port for landmark reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandmarkQuery: Send + Sync {
    async fn get_landmark(&self, id: &LandmarkId) -> Result<Landmark, Error>;

    async fn list_landmarks(&self, filter: LandmarkFilter) -> Result<Vec<Landmark>, Error>;

    /// Landmarks within the radius, nearest first.
    ///
    /// Fails with `invalid_request` unless the radius is in
    /// `(0, MAX_NEARBY_RADIUS_METERS]`.
    async fn find_nearby_landmarks(
        &self,
        request: NearbyLandmarksRequest,
    ) -> Result<Vec<NearbyLandmark>, Error>;
}

/// Fixture query over an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLandmarkQuery;

#[async_trait]
impl LandmarkQuery for FixtureLandmarkQuery {
    async fn get_landmark(&self, id: &LandmarkId) -> Result<Landmark, Error> {
        Err(Error::not_found(format!("landmark {id} not found")))
    }

    async fn list_landmarks(&self, _filter: LandmarkFilter) -> Result<Vec<Landmark>, Error> {
        Ok(Vec::new())
    }

    async fn find_nearby_landmarks(
        &self,
        _request: NearbyLandmarksRequest,
    ) -> Result<Vec<NearbyLandmark>, Error> {
        Ok(Vec::new())
    }
}
