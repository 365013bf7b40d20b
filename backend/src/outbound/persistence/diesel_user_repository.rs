//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId, Username, level_for_xp};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, from_bigint, pool_error_message, to_bigint,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, username: Option<&str>) -> UserRepositoryError {
    match classify_diesel_error(error, "user store") {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::UniqueViolation {
            message,
            constraint,
        } => match (username, constraint.as_deref()) {
            (Some(name), Some("users_username_key") | None) => {
                UserRepositoryError::duplicate_username(name)
            }
            _ => UserRepositoryError::query(message),
        },
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

pub(super) fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let username = Username::new(row.username)
        .map_err(|err| UserRepositoryError::query(format!("invalid username in database: {err}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        username,
        total_xp: from_bigint(row.total_xp, "total_xp").map_err(UserRepositoryError::query)?,
        level: from_bigint(row.level, "level").map_err(UserRepositoryError::query)?,
        created_at: row.created_at,
    })
}

/// Experience and level after adding `delta` to a stored row.
///
/// The level is recomputed from the new total but never lowered. The
/// `total_xp >= 0` column check keeps `unsigned_abs` lossless.
fn awarded_totals(row: &UserRow, delta: i64) -> (i64, i64) {
    let total = row.total_xp.saturating_add(delta);
    let earned = i64::try_from(level_for_xp(total.unsigned_abs())).unwrap_or(i64::MAX);
    (total, row.level.max(earned))
}

/// Lock the user row and add `delta` experience.
///
/// Must run inside a transaction; returns `None` for an unknown user.
pub(super) async fn award_locked(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    delta: i64,
) -> QueryResult<Option<UserRow>> {
    let current = users::table
        .filter(users::id.eq(user_id))
        .for_update()
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(current) = current else {
        return Ok(None);
    };

    let (total, level) = awarded_totals(&current, delta);
    diesel::update(users::table.filter(users::id.eq(user_id)))
        .set((users::total_xp.eq(total), users::level.eq(level)))
        .returning(UserRow::as_returning())
        .get_result(conn)
        .await
        .map(Some)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_user).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            username: user.username.as_ref(),
            total_xp: to_bigint(user.total_xp, "total_xp").map_err(UserRepositoryError::query)?,
            level: to_bigint(user.level, "level").map_err(UserRepositoryError::query)?,
            created_at: user.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(user.username.as_ref())))
    }

    async fn apply_xp(&self, id: &UserId, delta: u64) -> Result<Option<User>, UserRepositoryError> {
        let delta = to_bigint(delta, "experience award").map_err(UserRepositoryError::query)?;
        let user_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                award_locked(conn, user_id, delta).scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        if let Some(row) = &updated {
            debug!(user_id = %row.id, total_xp = row.total_xp, level = row.level, "experience applied");
        }
        updated.map(row_to_user).transpose()
    }
}
