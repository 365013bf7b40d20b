//! Driven port for cached per-city progress records.

use async_trait::async_trait;

use crate::domain::{CityId, ProgressRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by progress repository adapters.
    pub enum ProgressRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "progress repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "progress repository query failed: {message}",
    }
}

/// Port for storing progress records keyed by (user, city).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError>;

    /// Store `record` unless one exists for the pair; return the stored one.
    async fn create_if_absent(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, ProgressRepositoryError>;

    /// Insert or overwrite the record for its (user, city) pair.
    async fn save(&self, record: &ProgressRecord) -> Result<(), ProgressRepositoryError>;

    /// Every record for `user_id`, ordered by city id.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ProgressRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProgressRepository;

#[async_trait]
impl ProgressRepository for FixtureProgressRepository {
    async fn find(
        &self,
        _user_id: &UserId,
        _city_id: &CityId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError> {
        Ok(None)
    }

    async fn create_if_absent(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, ProgressRepositoryError> {
        Ok(record.clone())
    }

    async fn save(&self, _record: &ProgressRecord) -> Result<(), ProgressRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ProgressRepositoryError> {
        Ok(Vec::new())
    }
}
