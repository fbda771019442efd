//! API configuration

use serde::Deserialize;

use core_kernel::{CoreError, Currency};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Currency assumed when a request does not name one
    pub currency: Currency,
    /// JSON file of group snapshots loaded into the store at startup
    #[serde(default)]
    pub seed_path: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            currency: Currency::USD,
            seed_path: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("currency", defaults.currency.code())?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rejects settings the server cannot start with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::configuration("host must not be empty"));
        }
        if self.port == 0 {
            return Err(CoreError::configuration("port must be non-zero"));
        }
        if let Some(path) = &self.seed_path {
            if path.trim().is_empty() {
                return Err(CoreError::configuration("seed_path must not be blank when set"));
            }
        }
        Ok(())
    }
}
