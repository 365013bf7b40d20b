//! Discovery ledger handlers.
//!
//! ```text
//! POST /api/v1/discoveries
//! POST /api/v1/discoveries/nearby
//! GET  /api/v1/discoveries/stats?userId=
//! GET  /api/v1/users/{userId}/discoveries?cityId=
//! GET  /api/v1/users/{userId}/discoveries/{landmarkId}
//! ```
//!
//! Recording responds `201 Created` the first time an explorer discovers a
//! landmark and `200 OK` with the stored event on every replay.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{DiscoverNearbyRequest, RecordDiscoveryRequest};
use crate::domain::{
    DiscoveryEvent, DiscoveryMethod, DiscoveryOutcome, LandmarkId, NearbyDiscovery, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_discovery_method, parse_id, parse_optional_id,
    parse_optional_point, parse_point,
};

/// A stored discovery.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEventResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub landmark_id: String,
    #[schema(example = "ar_scan")]
    pub method: String,
    #[schema(format = "date-time")]
    pub discovered_at: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub xp_earned: u64,
}

impl From<DiscoveryEvent> for DiscoveryEventResponse {
    fn from(event: DiscoveryEvent) -> Self {
        Self {
            id: event.id.to_string(),
            user_id: event.user_id.to_string(),
            landmark_id: event.landmark_id.to_string(),
            method: event.method.to_string(),
            discovered_at: event.discovered_at.to_rfc3339(),
            latitude: event.reported_location.map(|point| point.latitude()),
            longitude: event.reported_location.map(|point| point.longitude()),
            xp_earned: event.xp_earned,
        }
    }
}

/// Result of recording a discovery.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOutcomeResponse {
    pub discovery: DiscoveryEventResponse,
    /// `false` when the landmark had already been discovered.
    pub newly_recorded: bool,
    /// Experience granted by this call; zero on replay.
    pub xp_awarded: u64,
    /// Explorer totals after the call.
    pub user: UserResponse,
}

impl From<DiscoveryOutcome> for DiscoveryOutcomeResponse {
    fn from(outcome: DiscoveryOutcome) -> Self {
        let xp_awarded = outcome.xp_awarded();
        Self {
            discovery: DiscoveryEventResponse::from(outcome.event),
            newly_recorded: outcome.newly_recorded,
            xp_awarded,
            user: UserResponse::from(outcome.user),
        }
    }
}

pub(crate) fn outcome_response(outcome: DiscoveryOutcome) -> HttpResponse {
    let mut builder = if outcome.newly_recorded {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    builder.json(DiscoveryOutcomeResponse::from(outcome))
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDiscoveryResponse {
    #[serde(flatten)]
    pub outcome: DiscoveryOutcomeResponse,
    pub distance_meters: f64,
}

impl From<NearbyDiscovery> for NearbyDiscoveryResponse {
    fn from(nearby: NearbyDiscovery) -> Self {
        Self {
            outcome: DiscoveryOutcomeResponse::from(nearby.outcome),
            distance_meters: nearby.distance_meters,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStatsResponse {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub total_discoveries: u64,
    pub total_xp: u64,
    pub level: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HasDiscoveredResponse {
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub landmark_id: String,
    pub discovered: bool,
}

/// Body for `POST /discoveries`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDiscoveryBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub landmark_id: String,
    /// `gps`, `ar_scan` (default), or `manual`.
    pub method: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Replaces the category award when set.
    pub xp_override: Option<u64>,
}

/// Body for `POST /discoveries/nearby`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverNearbyBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[schema(format = "uuid")]
    pub city_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Explorer whose totals are requested.
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListDiscoveriesQuery {
    pub city_id: Option<String>,
}

/// Record that an explorer discovered a landmark.
#[utoipa::path(
    post,
    path = "/api/v1/discoveries",
    request_body = RecordDiscoveryBody,
    responses(
        (status = 201, description = "Discovery recorded", body = DiscoveryOutcomeResponse),
        (status = 200, description = "Already discovered", body = DiscoveryOutcomeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown explorer or landmark", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["discoveries"],
    operation_id = "recordDiscovery"
)]
#[post("/discoveries")]
pub async fn record_discovery(
    state: web::Data<HttpState>,
    payload: web::Json<RecordDiscoveryBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let request = RecordDiscoveryRequest {
        user_id: parse_id(&payload.user_id, FieldName::new("userId"))?,
        landmark_id: parse_id(&payload.landmark_id, FieldName::new("landmarkId"))?,
        method: parse_discovery_method(payload.method.as_deref(), DiscoveryMethod::ArScan)?,
        reported_location: parse_optional_point(payload.latitude, payload.longitude)?,
        xp_override: payload.xp_override,
    };
    let outcome = state.discoveries.record_discovery(request).await?;
    Ok(outcome_response(outcome))
}

/// Record every landmark whose discovery radius contains the explorer.
#[utoipa::path(
    post,
    path = "/api/v1/discoveries/nearby",
    request_body = DiscoverNearbyBody,
    responses(
        (status = 200, description = "Landmarks in range, nearest first", body = [NearbyDiscoveryResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown explorer", body = ErrorSchema)
    ),
    tags = ["discoveries"],
    operation_id = "discoverNearby"
)]
#[post("/discoveries/nearby")]
pub async fn discover_nearby(
    state: web::Data<HttpState>,
    payload: web::Json<DiscoverNearbyBody>,
) -> ApiResult<web::Json<Vec<NearbyDiscoveryResponse>>> {
    let payload = payload.into_inner();
    let request = DiscoverNearbyRequest {
        user_id: parse_id(&payload.user_id, FieldName::new("userId"))?,
        origin: parse_point(payload.latitude, payload.longitude)?,
        city_id: parse_optional_id(payload.city_id.as_deref(), FieldName::new("cityId"))?,
    };
    let discoveries = state.discoveries.discover_nearby(request).await?;
    Ok(web::Json(
        discoveries
            .into_iter()
            .map(NearbyDiscoveryResponse::from)
            .collect(),
    ))
}

/// Discovery count and experience totals for an explorer.
#[utoipa::path(
    get,
    path = "/api/v1/discoveries/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Totals", body = DiscoveryStatsResponse),
        (status = 400, description = "Missing or invalid userId", body = ErrorSchema),
        (status = 404, description = "Unknown explorer", body = ErrorSchema)
    ),
    tags = ["discoveries"],
    operation_id = "discoveryStats"
)]
#[get("/discoveries/stats")]
pub async fn discovery_stats(
    state: web::Data<HttpState>,
    query: web::Query<StatsQuery>,
) -> ApiResult<web::Json<DiscoveryStatsResponse>> {
    let raw = query
        .into_inner()
        .user_id
        .ok_or_else(|| missing_field_error(FieldName::new("userId")))?;
    let user_id: UserId = parse_id(&raw, FieldName::new("userId"))?;
    let stats = state.discoveries_query.discovery_stats(&user_id).await?;
    Ok(web::Json(DiscoveryStatsResponse {
        user_id: user_id.to_string(),
        total_discoveries: stats.total_discoveries,
        total_xp: stats.total_xp,
        level: stats.level,
    }))
}

/// An explorer's discoveries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/discoveries",
    params(
        ("userId" = String, Path, format = "uuid", description = "Explorer id"),
        ListDiscoveriesQuery
    ),
    responses(
        (status = 200, description = "Discoveries", body = [DiscoveryEventResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["discoveries"],
    operation_id = "listDiscoveries"
)]
#[get("/users/{userId}/discoveries")]
pub async fn list_discoveries(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ListDiscoveriesQuery>,
) -> ApiResult<web::Json<Vec<DiscoveryEventResponse>>> {
    let user_id: UserId = parse_id(&path.into_inner(), FieldName::new("userId"))?;
    let city_id = parse_optional_id(query.city_id.as_deref(), FieldName::new("cityId"))?;
    let events = state
        .discoveries_query
        .list_discoveries(&user_id, city_id)
        .await?;
    Ok(web::Json(
        events.into_iter().map(DiscoveryEventResponse::from).collect(),
    ))
}

/// Whether an explorer has discovered a landmark.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/discoveries/{landmarkId}",
    params(
        ("userId" = String, Path, format = "uuid", description = "Explorer id"),
        ("landmarkId" = String, Path, format = "uuid", description = "Landmark id")
    ),
    responses(
        (status = 200, description = "Discovery flag", body = HasDiscoveredResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["discoveries"],
    operation_id = "hasDiscovered"
)]
#[get("/users/{userId}/discoveries/{landmarkId}")]
pub async fn has_discovered(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<HasDiscoveredResponse>> {
    let (raw_user, raw_landmark) = path.into_inner();
    let user_id: UserId = parse_id(&raw_user, FieldName::new("userId"))?;
    let landmark_id: LandmarkId = parse_id(&raw_landmark, FieldName::new("landmarkId"))?;
    let discovered = state
        .discoveries_query
        .has_discovered(&user_id, &landmark_id)
        .await?;
    Ok(web::Json(HasDiscoveredResponse {
        user_id: user_id.to_string(),
        landmark_id: landmark_id.to_string(),
        discovered,
    }))
}

#[cfg(test)]
#[path = "discoveries_tests.rs"]
mod tests;
