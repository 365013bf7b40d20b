//! Driving port for explorer registration.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, Username};

/// Driving port for user writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a new explorer at level 1. A taken username is a `conflict`.
    async fn register_user(&self, username: Username) -> Result<User, Error>;
}

/// Fixture command that accepts every username.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserCommand;

#[async_trait]
impl UserCommand for FixtureUserCommand {
    async fn register_user(&self, username: Username) -> Result<User, Error> {
        Ok(User::register(UserId::random(), username, chrono::Utc::now()))
    }
}
