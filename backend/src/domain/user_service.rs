//! Explorer registration and lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{UserCommand, UserQuery, UserRepository};
use crate::domain::service_errors::map_user_error;
use crate::domain::{Error, User, UserId, Username};

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U> UserCommand for UserService<U>
where
    U: UserRepository,
{
    async fn register_user(&self, username: Username) -> Result<User, Error> {
        let user = User::register(UserId::random(), username, self.clock.utc());
        self.users.create(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, username = %user.username, "explorer registered");
        Ok(user)
    }
}

#[async_trait]
impl<U> UserQuery for UserService<U>
where
    U: UserRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}
