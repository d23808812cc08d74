use std::env;
use tracing::{debug, error, info};

use crate::config::{parsed_var, required_var, ConfigError};

pub const DEFAULT_USER_COLLECTION: &str = "users";

/// MongoDB configuration structure
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    /// Collection holding user documents (defaults to "users")
    pub user_collection: Option<String>,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (required)
    /// - MONGO_USERNAME / MONGO_PASSWORD: credentials (optional)
    /// - MONGO_USER_COLLECTION: Collection name for users (optional)
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = required_var("MONGO_URI")?;
        let database = required_var("MONGO_DATABASE")?;
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        let password = env::var("MONGO_PASSWORD").ok();
        debug!(
            username = username.as_deref().unwrap_or("<none>"),
            password_set = password.is_some(),
            "MongoDB credentials"
        );

        let user_collection = env::var("MONGO_USER_COLLECTION").ok();
        let pool_size = parsed_var("MONGO_POOL_SIZE", 10u32)?;
        let connection_timeout_secs = parsed_var("MONGO_CONNECTION_TIMEOUT", 5u64)?;

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            user_collection,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!(collection = config.get_user_collection(), "MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Create MongoConfig for testing
    pub fn from_test_env() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "test_db".to_string(),
            username: Some("testuser".to_string()),
            password: Some("testpass".to_string()),
            user_collection: Some("test_users".to_string()),
            pool_size: 2,
            connection_timeout_secs: 2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            error!("{}", msg);
            Err(ConfigError::ValidationError(msg.to_string()))
        };

        if self.uri.is_empty() {
            return invalid("MongoDB URI cannot be empty");
        }
        if self.database.is_empty() {
            return invalid("MongoDB database cannot be empty");
        }
        if self.pool_size == 0 {
            return invalid("MongoDB pool size must be greater than 0");
        }
        if self.connection_timeout_secs == 0 {
            return invalid("MongoDB connection timeout must be greater than 0");
        }
        if self.username.as_deref() == Some("") {
            return invalid("MongoDB username cannot be empty if set");
        }
        if self.password.as_deref() == Some("") {
            return invalid("MongoDB password cannot be empty if set");
        }
        if self.user_collection.as_deref() == Some("") {
            return invalid("MongoDB user collection cannot be empty if set");
        }
        Ok(())
    }

    /// Get the user collection name
    pub fn get_user_collection(&self) -> &str {
        self.user_collection.as_deref().unwrap_or(DEFAULT_USER_COLLECTION)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "awsomeDb".to_string(),
            username: None,
            password: None,
            user_collection: None,
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
