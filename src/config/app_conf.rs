use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::config::{parsed_var, ConfigError};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the handling time of one request.
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// `APP_HOST` (default `127.0.0.1`), `APP_PORT` (default `8080`) and
    /// `APP_REQUEST_TIMEOUT` in seconds (default `15`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = parsed_var("APP_HOST", "127.0.0.1".to_string())?;
        let port = parsed_var("APP_PORT", 8080u16)?;
        let request_timeout_secs = parsed_var("APP_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "APP_REQUEST_TIMEOUT must be greater than 0".to_string(),
            ));
        }
        Ok(AppConfig { host, port, request_timeout_secs })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid APP_HOST value: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig { host: "0.0.0.0".to_string(), port: 3000, ..Default::default() };
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_host() {
        let config = AppConfig { host: "not a host".to_string(), ..Default::default() };
        assert!(matches!(config.socket_addr(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_default_request_timeout() {
        assert_eq!(AppConfig::default().request_timeout(), Duration::from_secs(15));
    }
}
