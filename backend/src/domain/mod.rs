//! Domain primitives, pure rules, ports, and services.
//!
//! Purpose: define the discovery and progress engine independently of HTTP
//! and storage. Pure functions (`distance_meters`, `find_nearby`,
//! `level_for_xp`, `compute_progress`) carry the rules; services orchestrate
//! them over the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Catalogue types: City, Landmark, Region, LandmarkCategory.
//! - Ledger types: DiscoveryEvent, DiscoveryMethod, DiscoveryOutcome.
//! - Progress types: ProgressRecord and its recomputation.
//! - Services: DiscoveryService, ProgressService, LandmarkService, UserService.

pub mod catalogue;
pub mod discovery;
pub mod discovery_service;
pub mod error;
pub mod experience;
pub mod geo;
pub mod ids;
pub mod landmark_service;
pub mod ports;
pub mod progress;
pub mod progress_service;
mod service_errors;
pub mod user;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::catalogue::{
    CatalogueValidationError, City, DEFAULT_DISCOVERY_RADIUS_METERS, DiscoveryRadius, Landmark,
    LandmarkCategory, Region, UnlockThreshold,
};
pub use self::discovery::{
    DiscoveryEvent, DiscoveryMethod, DiscoveryOutcome, DiscoveryStats, NearbyDiscovery,
    UnknownDiscoveryMethod,
};
pub use self::discovery_service::{
    DEFAULT_MAX_GPS_DISCOVERY_RADIUS_METERS, DiscoveryService, DiscoverySettings,
};
pub use self::error::{Error, ErrorCode};
pub use self::experience::{ExperienceTable, XP_PER_LEVEL, level_for_xp};
pub use self::geo::{
    BoundingBox, EARTH_RADIUS_METERS, GeoPoint, GeoValidationError, NearbyLandmark,
    distance_meters, find_nearby,
};
pub use self::ids::{CityId, DiscoveryId, IdParseError, LandmarkId, RegionId, UserId};
pub use self::landmark_service::LandmarkService;
pub use self::progress::{ProgressInputs, ProgressRecord, compute_progress};
pub use self::progress_service::ProgressService;
pub use self::user::{USERNAME_MAX, USERNAME_MIN, User, UserValidationError, Username};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use explorer::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
