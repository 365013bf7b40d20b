//! OpenAPI documentation for the explorer REST API.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and the health probes, plus
//! the error envelope schemas from [`crate::inbound::http::schemas`]. The
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::discoveries::{
    DiscoverNearbyBody, DiscoveryEventResponse, DiscoveryOutcomeResponse, DiscoveryStatsResponse,
    HasDiscoveredResponse, NearbyDiscoveryResponse, RecordDiscoveryBody,
};
use crate::inbound::http::landmarks::{
    DiscoverLandmarkBody, LandmarkResponse, NearbyLandmarkResponse,
};
use crate::inbound::http::progress::{ProgressResponse, RegionPointResponse, RegionResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{RegisterUserRequest, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "City Explorer discovery API",
        description = "Landmark discovery, experience, and per-city progress."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::discoveries::record_discovery,
        crate::inbound::http::discoveries::discover_nearby,
        crate::inbound::http::discoveries::discovery_stats,
        crate::inbound::http::discoveries::list_discoveries,
        crate::inbound::http::discoveries::has_discovered,
        crate::inbound::http::landmarks::list_landmarks,
        crate::inbound::http::landmarks::find_nearby_landmarks,
        crate::inbound::http::landmarks::get_landmark,
        crate::inbound::http::landmarks::discover_landmark,
        crate::inbound::http::progress::list_progress,
        crate::inbound::http::progress::get_city_progress,
        crate::inbound::http::progress::list_unlocked_regions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterUserRequest,
        UserResponse,
        RecordDiscoveryBody,
        DiscoverNearbyBody,
        DiscoveryEventResponse,
        DiscoveryOutcomeResponse,
        NearbyDiscoveryResponse,
        DiscoveryStatsResponse,
        HasDiscoveredResponse,
        DiscoverLandmarkBody,
        LandmarkResponse,
        NearbyLandmarkResponse,
        ProgressResponse,
        RegionResponse,
        RegionPointResponse,
    )),
    tags(
        (name = "users", description = "Explorer registration and lookup"),
        (name = "discoveries", description = "Idempotent discovery ledger"),
        (name = "landmarks", description = "Catalogue reads and proximity search"),
        (name = "progress", description = "Per-city completion and region unlocks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
