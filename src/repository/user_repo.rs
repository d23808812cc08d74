use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use tracing::{error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::user_query::UserQuery;

/// Fields carrying a unique index in the users collection.
pub const UNIQUE_FIELDS: [&str; 2] = ["email", "nickname"];

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user under a fresh identifier.
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    /// Replaces the six text fields and `updated_at`; returns the stored document.
    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, query: UserQuery) -> RepositoryResult<Vec<User>>;
}

pub struct UserRepositoryImpl {
    collection: Collection<User>,
}

impl UserRepositoryImpl {
    /// Connects using `MongoConfig` and prepares the users collection.
    pub async fn new(config: &MongoConfig) -> RepositoryResult<Self> {
        use mongodb::{options::{ClientOptions, Credential, ResolverConfig}, Client};

        let mut client_options = ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
        client_options.app_name = Some("UsersBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build());
        }
        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        Self::from_database(&db, config.get_user_collection()).await
    }

    /// Uses an existing database handle. The unique indexes are created if
    /// missing.
    pub async fn from_database(db: &Database, collection_name: &str) -> RepositoryResult<Self> {
        let collection = db.collection::<User>(collection_name);
        Self::ensure_indexes(&collection).await?;
        Ok(UserRepositoryImpl { collection })
    }

    async fn ensure_indexes(collection: &Collection<User>) -> RepositoryResult<()> {
        let indexes: Vec<IndexModel> = UNIQUE_FIELDS
            .iter()
            .map(|field| {
                let mut keys = bson::Document::new();
                keys.insert(*field, 1);
                IndexModel::builder()
                    .keys(keys)
                    .options(IndexOptions::builder().unique(true).build())
                    .build()
            })
            .collect();
        collection.create_indexes(indexes, None).await.map_err(|e| {
            error!("Failed to create unique indexes: {}", e);
            RepositoryError::from(e)
        })?;
        info!(collection = %collection.name(), "Unique indexes on email and nickname ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    #[tracing::instrument(skip(self, user), fields(nickname = %user.nickname))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        match self.collection.insert_one(&user, None).await {
            Ok(_) => {
                info!(user_id = ?user.id, "User inserted");
                Ok(user)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, user), fields(id = %id))]
    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User> {
        let filter = doc! { "_id": id };
        let update = doc! {
            "$set": {
                "first_name": user.first_name.as_str(),
                "last_name": user.last_name.as_str(),
                "nickname": user.nickname.as_str(),
                "password": user.password.as_str(),
                "email": user.email.as_str(),
                "country": user.country.as_str(),
                "updated_at": bson::DateTime::from_chrono(user.updated_at),
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        match self.collection.find_one_and_update(filter, update, options).await {
            Ok(Some(updated)) => {
                info!("User updated");
                Ok(updated)
            }
            Ok(None) => {
                error!("No user found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!("No user found to update for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(result) if result.deleted_count > 0 => {
                info!("User deleted");
                Ok(())
            }
            Ok(_) => {
                error!("No user found to delete for ID: {}", id);
                Err(RepositoryError::not_found(format!("No user found to delete for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to delete user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = query.page, page_size = query.page_size))]
    async fn list(&self, query: UserQuery) -> RepositoryResult<Vec<User>> {
        let cursor = self
            .collection
            .find(query.filter(), query.find_options())
            .await
            .map_err(|e| {
                error!("Failed to list users: {}", e);
                RepositoryError::from(e)
            })?;
        let users: Vec<User> = cursor.try_collect().await?;
        info!("Fetched {} users", users.len());
        Ok(users)
    }
}
