//! Per-city progress handlers.
//!
//! ```text
//! GET /api/v1/users/{userId}/progress
//! GET /api/v1/users/{userId}/progress/{cityId}
//! GET /api/v1/users/{userId}/progress/{cityId}/regions
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CityId, ProgressRecord, Region, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Completion summary for one explorer in one city.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub city_id: String,
    pub landmarks_discovered: u64,
    pub total_landmarks: u64,
    /// Share of the city's landmarks discovered, in percent.
    pub completion_percent: f64,
    pub unlocked_region_ids: Vec<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub last_computed_at: Option<String>,
}

impl From<ProgressRecord> for ProgressResponse {
    fn from(record: ProgressRecord) -> Self {
        let completion_percent = if record.total_landmarks == 0 {
            0.0
        } else {
            let ratio = record.landmarks_discovered as f64 / record.total_landmarks as f64;
            ratio * 100.0
        };
        Self {
            user_id: record.user_id.to_string(),
            city_id: record.city_id.to_string(),
            landmarks_discovered: record.landmarks_discovered,
            total_landmarks: record.total_landmarks,
            completion_percent,
            unlocked_region_ids: record
                .unlocked_region_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_at: record.created_at.to_rfc3339(),
            last_computed_at: record.last_computed_at.map(|at| at.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionPointResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// An unlocked region with its boundary ring.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub city_id: String,
    pub name: String,
    pub boundary: Vec<RegionPointResponse>,
    pub unlock_threshold: u64,
}

impl From<Region> for RegionResponse {
    fn from(region: Region) -> Self {
        Self {
            id: region.id.to_string(),
            city_id: region.city_id.to_string(),
            name: region.name,
            boundary: region
                .boundary
                .iter()
                .map(|point| RegionPointResponse {
                    latitude: point.latitude(),
                    longitude: point.longitude(),
                })
                .collect(),
            unlock_threshold: region.unlock_threshold.count(),
        }
    }
}

fn parse_user_and_city(raw_user: &str, raw_city: &str) -> ApiResult<(UserId, CityId)> {
    Ok((
        parse_id(raw_user, FieldName::new("userId"))?,
        parse_id(raw_city, FieldName::new("cityId"))?,
    ))
}

/// Every stored progress record for an explorer, ordered by city.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/progress",
    params(("userId" = String, Path, format = "uuid", description = "Explorer id")),
    responses(
        (status = 200, description = "Progress records", body = [ProgressResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["progress"],
    operation_id = "listProgress"
)]
#[get("/users/{userId}/progress")]
pub async fn list_progress(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ProgressResponse>>> {
    let user_id: UserId = parse_id(&path.into_inner(), FieldName::new("userId"))?;
    let records = state.progress_query.list_progress(&user_id).await?;
    Ok(web::Json(
        records.into_iter().map(ProgressResponse::from).collect(),
    ))
}

/// Freshly recomputed progress for one city, created on first access.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/progress/{cityId}",
    params(
        ("userId" = String, Path, format = "uuid", description = "Explorer id"),
        ("cityId" = String, Path, format = "uuid", description = "City id")
    ),
    responses(
        (status = 200, description = "Progress", body = ProgressResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown explorer or city", body = ErrorSchema)
    ),
    tags = ["progress"],
    operation_id = "getCityProgress"
)]
#[get("/users/{userId}/progress/{cityId}")]
pub async fn get_city_progress(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<ProgressResponse>> {
    let (raw_user, raw_city) = path.into_inner();
    let (user_id, city_id) = parse_user_and_city(&raw_user, &raw_city)?;
    state.progress.get_or_create(&user_id, &city_id).await?;
    let record = state.progress.refresh(&user_id, &city_id).await?;
    Ok(web::Json(ProgressResponse::from(record)))
}

/// Regions the explorer has unlocked in a city.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/progress/{cityId}/regions",
    params(
        ("userId" = String, Path, format = "uuid", description = "Explorer id"),
        ("cityId" = String, Path, format = "uuid", description = "City id")
    ),
    responses(
        (status = 200, description = "Unlocked regions", body = [RegionResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["progress"],
    operation_id = "listUnlockedRegions"
)]
#[get("/users/{userId}/progress/{cityId}/regions")]
pub async fn list_unlocked_regions(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<RegionResponse>>> {
    let (raw_user, raw_city) = path.into_inner();
    let (user_id, city_id) = parse_user_and_city(&raw_user, &raw_city)?;
    let regions = state
        .progress_query
        .unlocked_regions(&user_id, &city_id)
        .await?;
    Ok(web::Json(
        regions.into_iter().map(RegionResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::inbound::http::test_utils::{TestContext, nidaros_id, test_context};
    use crate::outbound::memory::{DEMO_USER, TRONDHEIM};

    #[rstest]
    #[actix_web::test]
    async fn fresh_progress_counts_the_city(test_context: TestContext) {
        let app = actix_test::init_service(test_context.app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{DEMO_USER}/progress/{TRONDHEIM}"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: ProgressResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.landmarks_discovered, 0);
        assert_eq!(body.total_landmarks, 5);
        assert!(body.unlocked_region_ids.is_empty());
        assert!(body.last_computed_at.is_some());
    }

    #[rstest]
    #[actix_web::test]
    async fn a_discovery_unlocks_the_first_region(test_context: TestContext) {
        let app = actix_test::init_service(test_context.app()).await;
        let recorded = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/discoveries")
                .set_json(json!({
                    "userId": DEMO_USER.to_string(),
                    "landmarkId": nidaros_id().to_string(),
                }))
                .to_request(),
        )
        .await;
        assert_eq!(recorded.status(), StatusCode::CREATED);

        let progress: ProgressResponse = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{DEMO_USER}/progress/{TRONDHEIM}"))
                .to_request(),
        )
        .await;
        assert_eq!(progress.landmarks_discovered, 1);
        assert!((progress.completion_percent - 20.0).abs() < f64::EPSILON);

        let regions: Vec<RegionResponse> = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!(
                    "/api/v1/users/{DEMO_USER}/progress/{TRONDHEIM}/regions"
                ))
                .to_request(),
        )
        .await;
        let names: Vec<_> = regions.iter().map(|region| region.name.as_str()).collect();
        assert_eq!(names, vec!["Midtbyen"]);
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_returns_stored_records(test_context: TestContext) {
        let app = actix_test::init_service(test_context.app()).await;
        let _: ProgressResponse = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{DEMO_USER}/progress/{TRONDHEIM}"))
                .to_request(),
        )
        .await;

        let records: Vec<ProgressResponse> = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{DEMO_USER}/progress"))
                .to_request(),
        )
        .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city_id, TRONDHEIM.to_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn regions_are_empty_without_a_record(test_context: TestContext) {
        let app = actix_test::init_service(test_context.app()).await;

        let regions: Vec<RegionResponse> = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!(
                    "/api/v1/users/{DEMO_USER}/progress/{TRONDHEIM}/regions"
                ))
                .to_request(),
        )
        .await;

        assert!(regions.is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_cities_are_not_found(test_context: TestContext) {
        let city = "00000000-0000-0000-0000-0000000000ff";
        let app = actix_test::init_service(test_context.app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{DEMO_USER}/progress/{city}"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
