//! PostgreSQL-backed progress cache.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProgressRepository, ProgressRepositoryError};
use crate::domain::{CityId, ProgressRecord, RegionId, UserId};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, from_bigint, pool_error_message, to_bigint,
};
use super::models::{NewProgressRow, ProgressRow, ProgressUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::user_progress;

/// Diesel-backed implementation of the progress repository port.
#[derive(Clone)]
pub struct DieselProgressRepository {
    pool: DbPool,
}

impl DieselProgressRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProgressRepositoryError {
    ProgressRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ProgressRepositoryError {
    match classify_diesel_error(error, "progress cache") {
        DieselFailure::Connection(message) => ProgressRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. } | DieselFailure::Query(message) => {
            ProgressRepositoryError::query(message)
        }
    }
}

fn row_to_record(row: ProgressRow) -> Result<ProgressRecord, ProgressRepositoryError> {
    Ok(ProgressRecord {
        user_id: UserId::from_uuid(row.user_id),
        city_id: CityId::from_uuid(row.city_id),
        landmarks_discovered: from_bigint(row.landmarks_discovered, "landmarks_discovered")
            .map_err(ProgressRepositoryError::query)?,
        total_landmarks: from_bigint(row.total_landmarks, "total_landmarks")
            .map_err(ProgressRepositoryError::query)?,
        unlocked_region_ids: row
            .unlocked_region_ids
            .into_iter()
            .map(RegionId::from_uuid)
            .collect(),
        created_at: row.created_at,
        last_computed_at: row.last_computed_at,
    })
}

fn record_to_row(record: &ProgressRecord) -> Result<NewProgressRow, ProgressRepositoryError> {
    Ok(NewProgressRow {
        user_id: *record.user_id.as_uuid(),
        city_id: *record.city_id.as_uuid(),
        landmarks_discovered: to_bigint(record.landmarks_discovered, "landmarks_discovered")
            .map_err(ProgressRepositoryError::query)?,
        total_landmarks: to_bigint(record.total_landmarks, "total_landmarks")
            .map_err(ProgressRepositoryError::query)?,
        unlocked_region_ids: record
            .unlocked_region_ids
            .iter()
            .map(|id| *id.as_uuid())
            .collect(),
        created_at: record.created_at,
        last_computed_at: record.last_computed_at,
    })
}

impl From<&NewProgressRow> for ProgressUpdate {
    fn from(row: &NewProgressRow) -> Self {
        Self {
            landmarks_discovered: row.landmarks_discovered,
            total_landmarks: row.total_landmarks,
            unlocked_region_ids: row.unlocked_region_ids.clone(),
            last_computed_at: row.last_computed_at,
        }
    }
}

#[async_trait]
impl ProgressRepository for DieselProgressRepository {
    async fn find(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = user_progress::table
            .find((user_id.as_uuid(), city_id.as_uuid()))
            .select(ProgressRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn create_if_absent(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, ProgressRepositoryError> {
        let row = record_to_row(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(user_progress::table)
            .values(&row)
            .on_conflict((user_progress::user_id, user_progress::city_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let stored = user_progress::table
            .find((row.user_id, row.city_id))
            .select(ProgressRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_record(stored)
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), ProgressRepositoryError> {
        let row = record_to_row(record)?;
        let update = ProgressUpdate::from(&row);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(user_progress::table)
            .values(&row)
            .on_conflict((user_progress::user_id, user_progress::city_id))
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ProgressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProgressRow> = user_progress::table
            .filter(user_progress::user_id.eq(user_id.as_uuid()))
            .order(user_progress::city_id.asc())
            .select(ProgressRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn records_survive_the_row_conversion() {
        let record = ProgressRecord {
            user_id: UserId::from_uuid(Uuid::from_u128(1)),
            city_id: CityId::from_uuid(Uuid::from_u128(2)),
            landmarks_discovered: 3,
            total_landmarks: 5,
            unlocked_region_ids: BTreeSet::from([RegionId::from_uuid(Uuid::from_u128(9))]),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            last_computed_at: Some(DateTime::<Utc>::UNIX_EPOCH),
        };
        let row = record_to_row(&record).expect("in range");

        let restored = row_to_record(ProgressRow {
            user_id: row.user_id,
            city_id: row.city_id,
            landmarks_discovered: row.landmarks_discovered,
            total_landmarks: row.total_landmarks,
            unlocked_region_ids: row.unlocked_region_ids.clone(),
            created_at: row.created_at,
            last_computed_at: row.last_computed_at,
        })
        .expect("valid row");

        assert_eq!(restored, record);
    }

    #[rstest]
    fn updates_leave_created_at_untouched() {
        let row = NewProgressRow {
            user_id: Uuid::from_u128(1),
            city_id: Uuid::from_u128(2),
            landmarks_discovered: 1,
            total_landmarks: 5,
            unlocked_region_ids: vec![Uuid::from_u128(9)],
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            last_computed_at: None,
        };

        let update = ProgressUpdate::from(&row);

        assert_eq!(update.landmarks_discovered, 1);
        assert_eq!(update.unlocked_region_ids, vec![Uuid::from_u128(9)]);
    }
}
