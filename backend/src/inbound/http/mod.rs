//! HTTP inbound adapter exposing the discovery and progress REST endpoints.

use actix_web::web;

pub mod discoveries;
pub mod error;
pub mod health;
pub mod landmarks;
pub mod progress;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope.
///
/// `landmarks/nearby` is registered ahead of `landmarks/{landmarkId}` so the
/// literal segment wins.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use explorer::inbound::http::{configure_api, state::HttpState};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HttpState::fixtures()))
///     .service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(users::get_user)
        .service(discoveries::record_discovery)
        .service(discoveries::discover_nearby)
        .service(discoveries::discovery_stats)
        .service(discoveries::list_discoveries)
        .service(discoveries::has_discovered)
        .service(landmarks::list_landmarks)
        .service(landmarks::find_nearby_landmarks)
        .service(landmarks::get_landmark)
        .service(landmarks::discover_landmark)
        .service(progress::list_progress)
        .service(progress::get_city_progress)
        .service(progress::list_unlocked_regions);
}
