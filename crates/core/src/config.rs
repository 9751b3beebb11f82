//! Configuration loading for Commerce Insight services.
//!
//! Environment variables use the `COMMERCE_INSIGHT_` prefix with bare
//! fallbacks (`DATABASE_URL`, `PORT`, `RUST_LOG`). Override hierarchy:
//! defaults < .env < environment.

use crate::error::CommerceInsightError;
use std::time::Duration;
use url::Url;

/// Standardized load-and-validate interface for service configuration
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables, applying defaults
    /// for optional values.
    fn from_env() -> Result<Self, CommerceInsightError>;

    /// Check that all fields are within acceptable ranges.
    fn validate(&self) -> Result<(), CommerceInsightError>;
}

/// PostgreSQL connection settings
///
/// - `COMMERCE_INSIGHT_DATABASE_URL` (required): connection URL
/// - `COMMERCE_INSIGHT_DATABASE_MAX_CONNECTIONS` (default: 20)
/// - `COMMERCE_INSIGHT_DATABASE_MIN_CONNECTIONS` (default: 2)
/// - `COMMERCE_INSIGHT_DATABASE_CONNECT_TIMEOUT` seconds (default: 30)
/// - `COMMERCE_INSIGHT_DATABASE_IDLE_TIMEOUT` seconds (default: 600)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/commerce_insight".to_string(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl ConfigLoader for DatabaseConfig {
    fn from_env() -> Result<Self, CommerceInsightError> {
        let url = std::env::var("COMMERCE_INSIGHT_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| {
                CommerceInsightError::configuration(
                    "DATABASE_URL or COMMERCE_INSIGHT_DATABASE_URL must be set",
                    Some("COMMERCE_INSIGHT_DATABASE_URL"),
                )
            })?;

        let max_connections = parse_env_var(
            "COMMERCE_INSIGHT_DATABASE_MAX_CONNECTIONS",
            DatabaseConfig::default().max_connections,
        )?;
        let min_connections = parse_env_var(
            "COMMERCE_INSIGHT_DATABASE_MIN_CONNECTIONS",
            DatabaseConfig::default().min_connections,
        )?;
        let connect_timeout_secs =
            parse_env_var("COMMERCE_INSIGHT_DATABASE_CONNECT_TIMEOUT", 30u64)?;
        let idle_timeout_secs = parse_env_var("COMMERCE_INSIGHT_DATABASE_IDLE_TIMEOUT", 600u64)?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
        })
    }

    fn validate(&self) -> Result<(), CommerceInsightError> {
        Url::parse(&self.url).map_err(|e| {
            CommerceInsightError::configuration(
                format!("Invalid DATABASE_URL: {}", e),
                Some("COMMERCE_INSIGHT_DATABASE_URL"),
            )
        })?;

        if self.max_connections == 0 {
            return Err(CommerceInsightError::configuration(
                "max_connections must be greater than 0",
                Some("COMMERCE_INSIGHT_DATABASE_MAX_CONNECTIONS"),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(CommerceInsightError::configuration(
                format!(
                    "min_connections ({}) cannot exceed max_connections ({})",
                    self.min_connections, self.max_connections
                ),
                Some("COMMERCE_INSIGHT_DATABASE_MIN_CONNECTIONS"),
            ));
        }

        if self.connect_timeout.as_secs() == 0 || self.idle_timeout.as_secs() == 0 {
            return Err(CommerceInsightError::configuration(
                "database timeouts must be greater than 0 seconds",
                Some("COMMERCE_INSIGHT_DATABASE_CONNECT_TIMEOUT"),
            ));
        }

        Ok(())
    }
}

/// HTTP service settings
///
/// - `COMMERCE_INSIGHT_SERVICE_HOST` (default: "0.0.0.0")
/// - `COMMERCE_INSIGHT_SERVICE_PORT` (default: 8080, `PORT` fallback)
/// - `COMMERCE_INSIGHT_SERVICE_WORKERS` (default: CPU count)
/// - `COMMERCE_INSIGHT_SERVICE_LOG_LEVEL` (default: "info", `RUST_LOG` fallback)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            log_level: "info".to_string(),
        }
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, CommerceInsightError> {
        let host = std::env::var("COMMERCE_INSIGHT_SERVICE_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or_else(|_| ServiceConfig::default().host);

        let port = parse_env_var("COMMERCE_INSIGHT_SERVICE_PORT", ServiceConfig::default().port)
            .or_else(|_| parse_env_var("PORT", ServiceConfig::default().port))?;

        let workers = parse_env_var(
            "COMMERCE_INSIGHT_SERVICE_WORKERS",
            ServiceConfig::default().workers,
        )?;

        let log_level = std::env::var("COMMERCE_INSIGHT_SERVICE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| ServiceConfig::default().log_level);

        Ok(Self {
            host,
            port,
            workers,
            log_level,
        })
    }

    fn validate(&self) -> Result<(), CommerceInsightError> {
        if self.port == 0 {
            return Err(CommerceInsightError::configuration(
                "port must be greater than 0",
                Some("COMMERCE_INSIGHT_SERVICE_PORT"),
            ));
        }

        if self.workers == 0 {
            return Err(CommerceInsightError::configuration(
                "workers must be greater than 0",
                Some("COMMERCE_INSIGHT_SERVICE_WORKERS"),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(CommerceInsightError::configuration(
                format!(
                    "Invalid log_level '{}'. Must be one of: {}",
                    self.log_level,
                    valid_log_levels.join(", ")
                ),
                Some("COMMERCE_INSIGHT_SERVICE_LOG_LEVEL"),
            ));
        }

        Ok(())
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T>(key: &str, default: T) -> Result<T, CommerceInsightError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>().map_err(|e| {
                CommerceInsightError::configuration(
                    format!("Failed to parse {}: {}", key, e),
                    Some(key),
                )
            })
        })
        .unwrap_or(Ok(default))
}

/// Load a .env file if present; missing files are not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_database_config_validation_invalid_url() {
        let config = DatabaseConfig {
            url: "not-a-valid-url".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_config_validation_min_exceeds_max() {
        let config = DatabaseConfig {
            url: "postgresql://localhost/test".to_string(),
            min_connections: 30,
            max_connections: 20,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.workers > 0);
    }

    #[test]
    fn test_service_config_validation_invalid_log_level() {
        let config = ServiceConfig {
            log_level: "loud".to_string(),
            ..ServiceConfig::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        match result.unwrap_err() {
            CommerceInsightError::ConfigurationError { message, .. } => {
                assert!(message.contains("Invalid log_level"));
            }
            _ => panic!("Expected ConfigurationError"),
        }
    }

    #[test]
    fn test_service_config_validation_zero_port() {
        let config = ServiceConfig {
            port: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_var_with_default() {
        let result: u32 = parse_env_var("COMMERCE_INSIGHT_NON_EXISTENT", 42).unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_env_var_invalid_value() {
        env::set_var("COMMERCE_INSIGHT_TEST_BAD_VAR", "not-a-number");
        let result: Result<u32, _> = parse_env_var("COMMERCE_INSIGHT_TEST_BAD_VAR", 42);
        assert!(result.is_err());
        env::remove_var("COMMERCE_INSIGHT_TEST_BAD_VAR");
    }
}
