//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `BACE` prefix and
//! `__` as the nesting separator, e.g. `BACE__SERVER__PORT=8080` or
//! `BACE__EXPERIMENT__REGISTRY_VERSION=three-binary`.

mod database;
mod error;
mod experiment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use experiment::ExperimentConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, CORS, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection to the design engine)
    pub database: DatabaseConfig,

    /// Experiment configuration (registry version, sampling defaults)
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables, reading a `.env` file
    /// first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("BACE").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.experiment.validate()?;
        Ok(())
    }
}
