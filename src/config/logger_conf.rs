use crate::config::{var_or, ConfigError};

/// Where and how verbosely the rolling log files are written.
///
/// The console filter comes from `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_dir: String,
    pub file_prefix: String,
    pub file_log_level: String,
    pub error_file_log_level: String,
}

impl LoggerConfig {
    /// Read before logging is up, so nothing here is logged.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = LoggerConfig {
            log_dir: var_or("LOG_DIR", "logs"),
            file_prefix: var_or("LOG_FILE_PREFIX", "users-backend"),
            file_log_level: var_or("FILE_LOG_LEVEL", "debug"),
            error_file_log_level: var_or("ERROR_FILE_LOG_LEVEL", "error"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_dir.is_empty() {
            return Err(ConfigError::ValidationError("LOG_DIR cannot be empty".to_string()));
        }
        if self.file_prefix.is_empty() {
            return Err(ConfigError::ValidationError("LOG_FILE_PREFIX cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            log_dir: "logs".to_string(),
            file_prefix: "users-backend".to_string(),
            file_log_level: "debug".to_string(),
            error_file_log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LoggerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_dir_is_rejected() {
        let config = LoggerConfig { log_dir: String::new(), ..Default::default() };
        assert!(config.validate().is_err());
    }
}
