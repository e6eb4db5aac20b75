//! API configuration
//!
//! Values come from `API_*` environment variables (for example `API_PORT`,
//! `API_DATABASE_URL`), falling back to the defaults below.

use std::time::Duration;

use serde::Deserialize;

use infra_db::DatabaseConfig;

/// API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level, used when `RUST_LOG` is not set
    pub log_level: String,
    /// Maximum pooled database connections
    pub max_connections: u32,
    /// Minimum pooled database connections
    pub min_connections: u32,
    /// Seconds a request waits for a database connection
    pub acquire_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/insurance".to_string(),
            log_level: "info".to_string(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("API"))
    }

    /// Loads configuration from any `config` source layered over the defaults
    pub fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port)?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("max_connections", defaults.max_connections)?
            .set_default("min_connections", defaults.min_connections)?
            .set_default("acquire_timeout_secs", defaults.acquire_timeout_secs)?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for `infra_db::create_pool`
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_apply_without_overrides() {
        let source = config::Environment::with_prefix("API").source(Some(HashMap::new()));
        let config = ApiConfig::from_source(source).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_environment_overrides() {
        let vars = HashMap::from([
            ("API_PORT".to_string(), "9090".to_string()),
            ("API_DATABASE_URL".to_string(), "postgres://db/policies".to_string()),
        ]);
        let source = config::Environment::with_prefix("API")
            .try_parsing(true)
            .source(Some(vars));

        let config = ApiConfig::from_source(source).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "postgres://db/policies");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_database_config() {
        let db = ApiConfig::default().database_config();
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.min_connections, 2);
        assert_eq!(db.acquire_timeout, Duration::from_secs(30));
    }
}
