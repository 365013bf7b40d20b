//! Driven port for read access to the city, landmark, and region catalogue.

use async_trait::async_trait;

use crate::domain::{
    City, CityId, DiscoveryRadius, GeoPoint, Landmark, LandmarkCategory, LandmarkId, Region,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue repository connection failed: {message}",
        /// Query failed during execution or returned malformed rows.
        Query { message: String } =>
            "catalogue repository query failed: {message}",
    }
}

/// Optional filters for listing landmarks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandmarkFilter {
    pub city_id: Option<CityId>,
    pub category: Option<LandmarkCategory>,
}

/// Read-only catalogue lookups consumed by the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    async fn get_landmark(
        &self,
        id: &LandmarkId,
    ) -> Result<Option<Landmark>, CatalogueRepositoryError>;

    async fn get_city(&self, id: &CityId) -> Result<Option<City>, CatalogueRepositoryError>;

    async fn count_landmarks(&self, city_id: &CityId) -> Result<u64, CatalogueRepositoryError>;

    async fn list_regions(&self, city_id: &CityId) -> Result<Vec<Region>, CatalogueRepositoryError>;

    /// Spatial prefilter around `origin`.
    ///
    /// The result may include landmarks beyond `radius_meters`; callers
    /// re-verify with the exact distance.
    async fn list_landmarks_near(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
        city_id: Option<CityId>,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError>;

    /// Landmarks matching `filter`, ordered by name then id.
    async fn list_landmarks(
        &self,
        filter: &LandmarkFilter,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError>;

    /// Largest discovery radius in the catalogue, `None` when it is empty.
    async fn max_discovery_radius(
        &self,
    ) -> Result<Option<DiscoveryRadius>, CatalogueRepositoryError>;
}

/// Fixture implementation describing an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueRepository;

#[async_trait]
impl CatalogueRepository for FixtureCatalogueRepository {
    async fn get_landmark(
        &self,
        _id: &LandmarkId,
    ) -> Result<Option<Landmark>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn get_city(&self, _id: &CityId) -> Result<Option<City>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn count_landmarks(&self, _city_id: &CityId) -> Result<u64, CatalogueRepositoryError> {
        Ok(0)
    }

    async fn list_regions(
        &self,
        _city_id: &CityId,
    ) -> Result<Vec<Region>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_landmarks_near(
        &self,
        _origin: GeoPoint,
        _radius_meters: f64,
        _city_id: Option<CityId>,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_landmarks(
        &self,
        _filter: &LandmarkFilter,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn max_discovery_radius(
        &self,
    ) -> Result<Option<DiscoveryRadius>, CatalogueRepositoryError> {
        Ok(None)
    }
}
