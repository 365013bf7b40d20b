//! Driving port for explorer lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Driving port for user reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;
}

/// Fixture query that knows no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserQuery;

#[async_trait]
impl UserQuery for FixtureUserQuery {
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        Err(Error::not_found(format!("user {id} not found")))
    }
}
