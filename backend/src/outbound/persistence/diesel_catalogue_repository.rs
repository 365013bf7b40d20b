//! PostgreSQL-backed catalogue read adapter.

use async_trait::async_trait;
use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError, LandmarkFilter};
use crate::domain::{
    BoundingBox, City, CityId, DiscoveryRadius, GeoPoint, Landmark, LandmarkCategory, LandmarkId,
    Region, RegionId, UnlockThreshold,
};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{CityRow, LandmarkRow, RegionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cities, landmarks, regions};

/// Diesel-backed implementation of the catalogue read port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    match classify_diesel_error(error, "catalogue read") {
        DieselFailure::Connection(message) => CatalogueRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. } | DieselFailure::Query(message) => {
            CatalogueRepositoryError::query(message)
        }
    }
}

// ---------------------------------------------------------------------------
// Row-to-domain converters
// ---------------------------------------------------------------------------

fn corrupt(what: &str, error: impl std::fmt::Display) -> CatalogueRepositoryError {
    CatalogueRepositoryError::query(format!("invalid {what} in database: {error}"))
}

fn row_to_landmark(row: LandmarkRow) -> Result<Landmark, CatalogueRepositoryError> {
    let location =
        GeoPoint::new(row.latitude, row.longitude).map_err(|err| corrupt("landmark location", err))?;
    let discovery_radius = DiscoveryRadius::new(i64::from(row.discovery_radius_meters))
        .map_err(|err| corrupt("discovery radius", err))?;
    Ok(Landmark {
        id: LandmarkId::from_uuid(row.id),
        city_id: CityId::from_uuid(row.city_id),
        name: row.name,
        description: row.description,
        category: LandmarkCategory::from(row.category),
        year_established: row.year_established,
        location,
        discovery_radius,
        image_url: row.image_url,
        summary: row.summary,
    })
}

fn row_to_city(row: CityRow) -> Result<City, CatalogueRepositoryError> {
    let center = GeoPoint::new(row.center_latitude, row.center_longitude)
        .map_err(|err| corrupt("city centre", err))?;
    Ok(City {
        id: CityId::from_uuid(row.id),
        name: row.name,
        country: row.country,
        center,
    })
}

fn row_to_region(row: RegionRow) -> Result<Region, CatalogueRepositoryError> {
    let boundary: Vec<GeoPoint> =
        serde_json::from_value(row.boundary).map_err(|err| corrupt("region boundary", err))?;
    let unlock_threshold = UnlockThreshold::new(i64::from(row.unlock_threshold))
        .map_err(|err| corrupt("unlock threshold", err))?;
    Ok(Region {
        id: RegionId::from_uuid(row.id),
        city_id: CityId::from_uuid(row.city_id),
        name: row.name,
        boundary,
        unlock_threshold,
    })
}

fn collect_landmarks(rows: Vec<LandmarkRow>) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
    rows.into_iter().map(row_to_landmark).collect()
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn get_landmark(
        &self,
        id: &LandmarkId,
    ) -> Result<Option<Landmark>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = landmarks::table
            .filter(landmarks::id.eq(id.as_uuid()))
            .select(LandmarkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_landmark).transpose()
    }

    async fn get_city(&self, id: &CityId) -> Result<Option<City>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = cities::table
            .filter(cities::id.eq(id.as_uuid()))
            .select(CityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_city).transpose()
    }

    async fn count_landmarks(&self, city_id: &CityId) -> Result<u64, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = landmarks::table
            .filter(landmarks::city_id.eq(city_id.as_uuid()))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(count).map_err(|err| corrupt("landmark count", err))
    }

    async fn list_regions(&self, city_id: &CityId) -> Result<Vec<Region>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RegionRow> = regions::table
            .filter(regions::city_id.eq(city_id.as_uuid()))
            .order(regions::id.asc())
            .select(RegionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_region).collect()
    }

    async fn list_landmarks_near(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
        city_id: Option<CityId>,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
        let bbox = BoundingBox::around(origin, radius_meters);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = landmarks::table
            .filter(landmarks::latitude.between(bbox.min_latitude, bbox.max_latitude))
            .filter(landmarks::longitude.between(bbox.min_longitude, bbox.max_longitude))
            .select(LandmarkRow::as_select())
            .into_boxed();
        if let Some(city) = city_id {
            query = query.filter(landmarks::city_id.eq(*city.as_uuid()));
        }

        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        collect_landmarks(rows)
    }

    async fn list_landmarks(
        &self,
        filter: &LandmarkFilter,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = landmarks::table
            .order((landmarks::name.asc(), landmarks::id.asc()))
            .select(LandmarkRow::as_select())
            .into_boxed();
        if let Some(city) = filter.city_id {
            query = query.filter(landmarks::city_id.eq(*city.as_uuid()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(landmarks::category.eq(category.as_str().to_owned()));
        }

        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        collect_landmarks(rows)
    }

    async fn max_discovery_radius(
        &self,
    ) -> Result<Option<DiscoveryRadius>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let largest: Option<i32> = landmarks::table
            .select(max(landmarks::discovery_radius_meters))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        largest
            .map(|meters| {
                DiscoveryRadius::new(i64::from(meters)).map_err(|err| corrupt("discovery radius", err))
            })
            .transpose()
    }
}
