use std::env;

use dotenvy::dotenv;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, Clone, Validate)]
pub struct Config {
    pub database_url: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub db_max_connections: u32,
    pub use_memory_store: bool,
    /// JSON array of records loaded into the memory store at startup.
    pub memory_seed_path: Option<String>,
    #[validate(range(min = 1))]
    pub server_port: u16,
}

/// Reads `name` and parses it, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load environment variables from `.env` file (if it exists)
        dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            use_memory_store: parse_var("USE_MEMORY_STORE", false)?,
            memory_seed_path: env::var("MEMORY_SEED_PATH").ok().filter(|s| !s.is_empty()),
            server_port: parse_var("SERVER_PORT", 3000)?,
        };

        config.check()?;
        Ok(config)
    }

    /// Validate ranges and cross-field requirements.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;

        if !self.use_memory_store && self.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        Ok(())
    }
}
