//! Catalogue reads and nearby landmark search.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CatalogueRepository, DEFAULT_NEARBY_RADIUS_METERS, LandmarkFilter, LandmarkQuery,
    MAX_NEARBY_RADIUS_METERS, NearbyLandmarksRequest,
};
use crate::domain::service_errors::map_catalogue_error;
use crate::domain::{Error, Landmark, LandmarkId, NearbyLandmark, find_nearby};

fn validate_radius(radius_meters: f64) -> Result<f64, Error> {
    if radius_meters.is_finite() && radius_meters > 0.0 && radius_meters <= MAX_NEARBY_RADIUS_METERS
    {
        return Ok(radius_meters);
    }
    Err(Error::invalid_request(format!(
        "radiusMeters must be greater than 0 and at most {MAX_NEARBY_RADIUS_METERS}"
    ))
    .with_details(serde_json::json!({
        "field": "radiusMeters",
        "value": radius_meters,
        "code": "out_of_range",
    })))
}

/// Landmark service implementing [`LandmarkQuery`].
#[derive(Clone)]
pub struct LandmarkService<C> {
    catalogue: Arc<C>,
}

impl<C> LandmarkService<C> {
    /// Create the service over a catalogue repository.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl<C> LandmarkQuery for LandmarkService<C>
where
    C: CatalogueRepository,
{
    async fn get_landmark(&self, id: &LandmarkId) -> Result<Landmark, Error> {
        self.catalogue
            .get_landmark(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("landmark {id} not found")))
    }

    async fn list_landmarks(&self, filter: LandmarkFilter) -> Result<Vec<Landmark>, Error> {
        self.catalogue
            .list_landmarks(&filter)
            .await
            .map_err(map_catalogue_error)
    }

    async fn find_nearby_landmarks(
        &self,
        request: NearbyLandmarksRequest,
    ) -> Result<Vec<NearbyLandmark>, Error> {
        let radius =
            validate_radius(request.radius_meters.unwrap_or(DEFAULT_NEARBY_RADIUS_METERS))?;
        let candidates = self
            .catalogue
            .list_landmarks_near(request.origin, radius, request.city_id)
            .await
            .map_err(map_catalogue_error)?;
        let prefiltered = candidates.len();
        let nearby = find_nearby(request.origin, radius, candidates);

        debug!(
            radius_meters = radius,
            prefiltered,
            matched = nearby.len(),
            "nearby landmark search"
        );
        Ok(nearby)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockCatalogueRepository;
    use crate::domain::test_support::{landmark_at, landmark_id, point};
    use crate::domain::{CityId, ErrorCode, LandmarkCategory};

    fn city() -> CityId {
        CityId::from_uuid(Uuid::from_u128(100))
    }

    fn request(radius_meters: Option<f64>) -> NearbyLandmarksRequest {
        NearbyLandmarksRequest {
            origin: point(63.4305, 10.3951),
            radius_meters,
            city_id: None,
        }
    }

    #[rstest]
    #[case(Some(0.0))]
    #[case(Some(-5.0))]
    #[case(Some(50_000.5))]
    #[case(Some(f64::NAN))]
    #[tokio::test]
    async fn rejects_out_of_range_radius(#[case] radius: Option<f64>) {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue.expect_list_landmarks_near().times(0);
        let service = LandmarkService::new(Arc::new(catalogue));

        let error = service
            .find_nearby_landmarks(request(radius))
            .await
            .expect_err("invalid radius");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn defaults_radius_and_drops_prefilter_overshoot() {
        let mut catalogue = MockCatalogueRepository::new();
        let inside = landmark_at(5, city(), LandmarkCategory::Royal, point(63.4308, 10.3936));
        let outside = landmark_at(1, city(), LandmarkCategory::Historic, point(63.4270, 10.3969));
        catalogue
            .expect_list_landmarks_near()
            .withf(|_, radius, _| *radius == DEFAULT_NEARBY_RADIUS_METERS)
            .returning(move |_, _, _| Ok(vec![outside.clone(), inside.clone()]));
        let service = LandmarkService::new(Arc::new(catalogue));

        let nearby = service
            .find_nearby_landmarks(request(None))
            .await
            .expect("search succeeds");

        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].landmark.id, landmark_id(5));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_landmark_is_not_found() {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue.expect_get_landmark().returning(|_| Ok(None));
        let service = LandmarkService::new(Arc::new(catalogue));

        let error = service
            .get_landmark(&landmark_id(9))
            .await
            .expect_err("unknown landmark");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
