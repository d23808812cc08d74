use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

use crate::model::user::User;
use crate::repository::user_query::UserQuery;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::user_validation::validate_user;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Stores a new user; any id or timestamps on `user` are replaced.
    async fn create_user(&self, user: User) -> Result<User, ServiceError>;
    async fn update_user(&self, id: &str, user: User) -> Result<User, ServiceError>;
    /// Returns the identifier of the removed user.
    async fn delete_user(&self, id: &str) -> Result<ObjectId, ServiceError>;
    /// Returns one page of users and the number of users in that page.
    async fn list_users(&self, query: UserQuery) -> Result<(Vec<User>, usize), ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }
}

// Millisecond precision, the resolution of a BSON date.
fn now() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

fn parse_user_id(id: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(id).map_err(|_| ServiceError::NotFound(format!("No user with ID: {}", id)))
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, user), fields(nickname = %user.nickname))]
    async fn create_user(&self, mut user: User) -> Result<User, ServiceError> {
        info!("Creating user");
        let time = now();
        user.id = None;
        user.created_at = time;
        user.updated_at = time;
        validate_user(&user)?;

        let inserted = self.user_repo.insert(user).await;
        match &inserted {
            Ok(u) => info!(user_id = ?u.id, "User created successfully"),
            Err(e) => error!("Failed to create user: {e}"),
        }
        Ok(inserted?)
    }

    #[instrument(skip(self, user), fields(id = %id))]
    async fn update_user(&self, id: &str, mut user: User) -> Result<User, ServiceError> {
        info!("Updating user");
        let object_id = parse_user_id(id)?;
        user.updated_at = now();
        validate_user(&user)?;

        let updated = self.user_repo.update(object_id, user).await;
        match &updated {
            Ok(_) => info!("User updated successfully"),
            Err(e) => error!("Failed to update user: {e}"),
        }
        Ok(updated?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_user(&self, id: &str) -> Result<ObjectId, ServiceError> {
        info!("Deleting user");
        let object_id = parse_user_id(id)?;
        self.user_repo.delete(object_id).await.map_err(|e| {
            error!("Failed to delete user: {e}");
            ServiceError::from(e)
        })?;
        info!("User deleted successfully");
        Ok(object_id)
    }

    #[instrument(skip(self, query))]
    async fn list_users(&self, query: UserQuery) -> Result<(Vec<User>, usize), ServiceError> {
        let users = self.user_repo.list(query).await.map_err(|e| {
            error!("Failed to list users: {e}");
            ServiceError::from(e)
        })?;
        let count = users.len();
        Ok((users, count))
    }
}
