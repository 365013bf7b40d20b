//! Internal Diesel row structs.
//!
//! Never exposed to the domain; repositories convert to and from domain
//! types at the adapter boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{cities, discoveries, landmarks, regions, user_progress, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub total_xp: i64,
    pub level: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub total_xp: i64,
    pub level: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CityRow {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub center_latitude: f64,
    pub center_longitude: f64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = landmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LandmarkRow {
    pub id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub year_established: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    pub discovery_radius_meters: i32,
    pub image_url: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = regions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RegionRow {
    pub id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub boundary: serde_json::Value,
    pub unlock_threshold: i32,
}

// ---------------------------------------------------------------------------
// Discovery ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = discoveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DiscoveryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub landmark_id: Uuid,
    pub method: String,
    pub discovered_at: DateTime<Utc>,
    pub reported_latitude: Option<f64>,
    pub reported_longitude: Option<f64>,
    pub xp_earned: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = discoveries)]
pub(crate) struct NewDiscoveryRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub landmark_id: Uuid,
    pub method: &'a str,
    pub discovered_at: DateTime<Utc>,
    pub reported_latitude: Option<f64>,
    pub reported_longitude: Option<f64>,
    pub xp_earned: i64,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_progress)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgressRow {
    pub user_id: Uuid,
    pub city_id: Uuid,
    pub landmarks_discovered: i64,
    pub total_landmarks: i64,
    pub unlocked_region_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_computed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_progress)]
pub(crate) struct NewProgressRow {
    pub user_id: Uuid,
    pub city_id: Uuid,
    pub landmarks_discovered: i64,
    pub total_landmarks: i64,
    pub unlocked_region_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_computed_at: Option<DateTime<Utc>>,
}

/// Columns rewritten when a recomputed record is saved.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_progress)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProgressUpdate {
    pub landmarks_discovered: i64,
    pub total_landmarks: i64,
    pub unlocked_region_ids: Vec<Uuid>,
    pub last_computed_at: Option<DateTime<Utc>>,
}
