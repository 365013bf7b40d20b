//! Catalogue read and nearby search handlers.
//!
//! ```text
//! GET  /api/v1/landmarks?cityId=&category=
//! GET  /api/v1/landmarks/nearby?latitude=&longitude=&radiusMeters=&cityId=
//! GET  /api/v1/landmarks/{landmarkId}
//! POST /api/v1/landmarks/{landmarkId}/discover
//! ```
//!
//! `nearby` must be registered before `{landmarkId}` so it is not captured
//! as an id.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{LandmarkFilter, NearbyLandmarksRequest, RecordDiscoveryRequest};
use crate::domain::{
    DiscoveryMethod, Landmark, LandmarkCategory, LandmarkId, NearbyLandmark,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::discoveries::{DiscoveryOutcomeResponse, outcome_response};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_discovery_method, parse_id, parse_optional_id,
    parse_optional_point, parse_point,
};

/// Catalogue entry as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub city_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "Historic")]
    pub category: String,
    pub year_established: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    pub discovery_radius_meters: u32,
    pub image_url: Option<String>,
    pub summary: Option<String>,
}

impl From<Landmark> for LandmarkResponse {
    fn from(landmark: Landmark) -> Self {
        Self {
            id: landmark.id.to_string(),
            city_id: landmark.city_id.to_string(),
            name: landmark.name,
            description: landmark.description,
            category: landmark.category.to_string(),
            year_established: landmark.year_established,
            latitude: landmark.location.latitude(),
            longitude: landmark.location.longitude(),
            discovery_radius_meters: landmark.discovery_radius.meters(),
            image_url: landmark.image_url,
            summary: landmark.summary,
        }
    }
}

/// A landmark with its distance from the search origin.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyLandmarkResponse {
    #[serde(flatten)]
    pub landmark: LandmarkResponse,
    pub distance_meters: f64,
}

impl From<NearbyLandmark> for NearbyLandmarkResponse {
    fn from(nearby: NearbyLandmark) -> Self {
        Self {
            landmark: LandmarkResponse::from(nearby.landmark),
            distance_meters: nearby.distance_meters,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListLandmarksQuery {
    /// Restrict to one city.
    pub city_id: Option<String>,
    /// Exact category label, e.g. `Historic`.
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NearbyLandmarksQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Defaults to 100; must be in (0, 50000].
    pub radius_meters: Option<f64>,
    pub city_id: Option<String>,
}

/// Body for discovering a landmark named in the path.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverLandmarkBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    /// `gps`, `ar_scan` (default), or `manual`.
    pub method: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// List catalogue landmarks ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/landmarks",
    params(ListLandmarksQuery),
    responses(
        (status = 200, description = "Landmarks", body = [LandmarkResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["landmarks"],
    operation_id = "listLandmarks"
)]
#[get("/landmarks")]
pub async fn list_landmarks(
    state: web::Data<HttpState>,
    query: web::Query<ListLandmarksQuery>,
) -> ApiResult<web::Json<Vec<LandmarkResponse>>> {
    let query = query.into_inner();
    let filter = LandmarkFilter {
        city_id: parse_optional_id(query.city_id.as_deref(), FieldName::new("cityId"))?,
        category: query
            .category
            .filter(|label| !label.is_empty())
            .map(LandmarkCategory::from),
    };
    let landmarks = state.landmarks.list_landmarks(filter).await?;
    Ok(web::Json(
        landmarks.into_iter().map(LandmarkResponse::from).collect(),
    ))
}

/// Landmarks within a radius of a point, nearest first.
#[utoipa::path(
    get,
    path = "/api/v1/landmarks/nearby",
    params(NearbyLandmarksQuery),
    responses(
        (status = 200, description = "Nearby landmarks", body = [NearbyLandmarkResponse]),
        (status = 400, description = "Invalid coordinates or radius", body = ErrorSchema)
    ),
    tags = ["landmarks"],
    operation_id = "findNearbyLandmarks"
)]
#[get("/landmarks/nearby")]
pub async fn find_nearby_landmarks(
    state: web::Data<HttpState>,
    query: web::Query<NearbyLandmarksQuery>,
) -> ApiResult<web::Json<Vec<NearbyLandmarkResponse>>> {
    let query = query.into_inner();
    let latitude = query
        .latitude
        .ok_or_else(|| missing_field_error(FieldName::new("latitude")))?;
    let longitude = query
        .longitude
        .ok_or_else(|| missing_field_error(FieldName::new("longitude")))?;
    let request = NearbyLandmarksRequest {
        origin: parse_point(latitude, longitude)?,
        radius_meters: query.radius_meters,
        city_id: parse_optional_id(query.city_id.as_deref(), FieldName::new("cityId"))?,
    };
    let nearby = state.landmarks.find_nearby_landmarks(request).await?;
    Ok(web::Json(
        nearby.into_iter().map(NearbyLandmarkResponse::from).collect(),
    ))
}

/// Fetch one landmark.
#[utoipa::path(
    get,
    path = "/api/v1/landmarks/{landmarkId}",
    params(("landmarkId" = String, Path, format = "uuid", description = "Landmark id")),
    responses(
        (status = 200, description = "Landmark", body = LandmarkResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown landmark", body = ErrorSchema)
    ),
    tags = ["landmarks"],
    operation_id = "getLandmark"
)]
#[get("/landmarks/{landmarkId}")]
pub async fn get_landmark(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<LandmarkResponse>> {
    let landmark_id: LandmarkId = parse_id(&path.into_inner(), FieldName::new("landmarkId"))?;
    let landmark = state.landmarks.get_landmark(&landmark_id).await?;
    Ok(web::Json(LandmarkResponse::from(landmark)))
}

/// Record a discovery of this landmark, earning its category's experience.
///
/// Responds `201` for a new discovery and `200` when the explorer had
/// already discovered it.
#[utoipa::path(
    post,
    path = "/api/v1/landmarks/{landmarkId}/discover",
    params(("landmarkId" = String, Path, format = "uuid", description = "Landmark id")),
    request_body = DiscoverLandmarkBody,
    responses(
        (status = 201, description = "Discovery recorded", body = DiscoveryOutcomeResponse),
        (status = 200, description = "Already discovered", body = DiscoveryOutcomeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown explorer or landmark", body = ErrorSchema)
    ),
    tags = ["landmarks"],
    operation_id = "discoverLandmark"
)]
#[post("/landmarks/{landmarkId}/discover")]
pub async fn discover_landmark(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DiscoverLandmarkBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let request = RecordDiscoveryRequest {
        user_id: parse_id(&payload.user_id, FieldName::new("userId"))?,
        landmark_id: parse_id(&path.into_inner(), FieldName::new("landmarkId"))?,
        method: parse_discovery_method(payload.method.as_deref(), DiscoveryMethod::ArScan)?,
        reported_location: parse_optional_point(payload.latitude, payload.longitude)?,
        xp_override: None,
    };
    let outcome = state.discoveries.record_discovery(request).await?;
    Ok(outcome_response(outcome))
}

#[cfg(test)]
#[path = "landmarks_tests.rs"]
mod tests;
