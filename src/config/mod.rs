pub mod app_conf;
pub mod logger_conf;
pub mod mongo_conf;

pub use app_conf::AppConfig;
pub use logger_conf::LoggerConfig;
pub use mongo_conf::MongoConfig;

use std::env;
use std::str::FromStr;
use tracing::{error, warn};

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Reads a variable that must be set.
pub(crate) fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| {
        error!("{} environment variable not found", name);
        ConfigError::EnvVarNotFound(name.to_string())
    })
}

/// Reads a variable without logging, for settings needed before the
/// subscriber is installed. Unset or empty falls back to `default`.
pub(crate) fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Reads and parses a variable, falling back to `default` when unset.
pub(crate) fn parsed_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("Invalid {} value: {}", name, raw))
        }),
        Err(_) => {
            warn!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_or_falls_back_when_unset() {
        assert_eq!(var_or("USERS_BACKEND_UNSET_TEST_VARIABLE", "fallback"), "fallback");
    }

    #[test]
    fn test_parsed_var_falls_back_when_unset() {
        assert_eq!(parsed_var("USERS_BACKEND_UNSET_TEST_PORT", 42u16).unwrap(), 42);
    }
}
