//! PostgreSQL-backed discovery ledger.
//!
//! The `discoveries_user_landmark_key` unique constraint is the source of
//! truth for "at most one event per (user, landmark)". A racing insert
//! surfaces as `DiscoveryRepositoryError::Conflict`, which the ledger
//! service resolves by replaying the stored event. Events are written in the
//! same transaction as the owner's experience award.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{DiscoveryRepository, DiscoveryRepositoryError};
use crate::domain::{
    CityId, DiscoveryEvent, DiscoveryId, DiscoveryMethod, GeoPoint, LandmarkId, User, UserId,
};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, from_bigint, pool_error_message, to_bigint,
};
use super::diesel_user_repository::{award_locked, row_to_user};
use super::models::{DiscoveryRow, NewDiscoveryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{discoveries, landmarks};

/// Diesel-backed implementation of the discovery ledger port.
#[derive(Clone)]
pub struct DieselDiscoveryRepository {
    pool: DbPool,
}

impl DieselDiscoveryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DiscoveryRepositoryError {
    DiscoveryRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> DiscoveryRepositoryError {
    match classify_diesel_error(error, "discovery ledger") {
        DieselFailure::Connection(message) => DiscoveryRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. } => {
            DiscoveryRepositoryError::conflict(message)
        }
        DieselFailure::Query(message) => DiscoveryRepositoryError::query(message),
    }
}

fn row_to_event(row: DiscoveryRow) -> Result<DiscoveryEvent, DiscoveryRepositoryError> {
    let method = DiscoveryMethod::from_str(&row.method).map_err(|err| {
        DiscoveryRepositoryError::query(format!("invalid discovery method in database: {err}"))
    })?;
    let reported_location = match (row.reported_latitude, row.reported_longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude).map_err(
            |err| DiscoveryRepositoryError::query(format!("invalid reported location: {err}")),
        )?),
        _ => None,
    };
    Ok(DiscoveryEvent {
        id: DiscoveryId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        landmark_id: LandmarkId::from_uuid(row.landmark_id),
        method,
        discovered_at: row.discovered_at,
        reported_location,
        xp_earned: from_bigint(row.xp_earned, "xp_earned").map_err(DiscoveryRepositoryError::query)?,
    })
}

fn count_to_u64(count: i64) -> Result<u64, DiscoveryRepositoryError> {
    from_bigint(count, "discovery count").map_err(DiscoveryRepositoryError::query)
}

#[async_trait]
impl DiscoveryRepository for DieselDiscoveryRepository {
    async fn find(
        &self,
        user_id: &UserId,
        landmark_id: &LandmarkId,
    ) -> Result<Option<DiscoveryEvent>, DiscoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = discoveries::table
            .filter(
                discoveries::user_id
                    .eq(user_id.as_uuid())
                    .and(discoveries::landmark_id.eq(landmark_id.as_uuid())),
            )
            .select(DiscoveryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_event).transpose()
    }

    async fn insert_and_award(
        &self,
        event: &DiscoveryEvent,
    ) -> Result<Option<User>, DiscoveryRepositoryError> {
        let row = NewDiscoveryRow {
            id: *event.id.as_uuid(),
            user_id: *event.user_id.as_uuid(),
            landmark_id: *event.landmark_id.as_uuid(),
            method: event.method.as_str(),
            discovered_at: event.discovered_at,
            reported_latitude: event.reported_location.map(|point| point.latitude()),
            reported_longitude: event.reported_location.map(|point| point.longitude()),
            xp_earned: to_bigint(event.xp_earned, "xp_earned")
                .map_err(DiscoveryRepositoryError::query)?,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The user row is locked first so awards for one explorer serialise;
        // a unique violation on the insert rolls the award back.
        let awarded = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(user) = award_locked(conn, row.user_id, row.xp_earned).await? else {
                        return Ok(None);
                    };
                    diesel::insert_into(discoveries::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(Some(user))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if let Some(user) = &awarded {
            debug!(
                user_id = %user.id,
                landmark_id = %event.landmark_id,
                total_xp = user.total_xp,
                "discovery stored with award"
            );
        }
        awarded
            .map(|user| {
                row_to_user(user).map_err(|err| DiscoveryRepositoryError::query(err.to_string()))
            })
            .transpose()
    }

    async fn count_for_city(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<u64, DiscoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = discoveries::table
            .inner_join(landmarks::table)
            .filter(discoveries::user_id.eq(user_id.as_uuid()))
            .filter(landmarks::city_id.eq(city_id.as_uuid()))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_u64(count)
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, DiscoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = discoveries::table
            .filter(discoveries::user_id.eq(user_id.as_uuid()))
            .select(count_star())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_u64(count)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, DiscoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = discoveries::table
            .inner_join(landmarks::table)
            .filter(discoveries::user_id.eq(*user_id.as_uuid()))
            .order((discoveries::discovered_at.desc(), discoveries::id.desc()))
            .select(DiscoveryRow::as_select())
            .into_boxed();
        if let Some(city) = city_id {
            query = query.filter(landmarks::city_id.eq(*city.as_uuid()));
        }

        let rows: Vec<DiscoveryRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_event).collect()
    }
}
