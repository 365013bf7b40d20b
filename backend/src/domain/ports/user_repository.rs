//! Driven port for explorer accounts and their experience totals.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } =>
            "username already registered: {username}",
    }
}

/// Port for registering users and applying experience awards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new user, failing with `DuplicateUsername` on a taken name.
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Atomically add `delta` experience and return the updated user.
    ///
    /// The stored level never decreases. Returns `None` when the user does
    /// not exist.
    async fn apply_xp(&self, id: &UserId, delta: u64) -> Result<Option<User>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn apply_xp(
        &self,
        _id: &UserId,
        _delta: u64,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_knows_no_users() {
        let repo = FixtureUserRepository;
        let id = UserId::random();

        assert!(repo.find_by_id(&id).await.expect("lookup succeeds").is_none());
        assert!(repo.apply_xp(&id, 10).await.expect("award succeeds").is_none());
    }

    #[rstest]
    fn duplicate_username_names_the_username() {
        let err = UserRepositoryError::duplicate_username("ada");
        assert_eq!(err.to_string(), "username already registered: ada");
    }
}
