//! # Flowtuple Configuration
//!
//! Hierarchical configuration for the flowtuple tools.
//!
//! ## Features
//! - **Layered sources**: defaults, YAML files and `FLOWTUPLE_*` environment
//! - **Validation**: every loaded configuration is checked with `validator`

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod input;
mod output;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use input::InputConfig;
pub use output::OutputConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/flowtuple.yaml";
const ENV_PREFIX: &str = "FLOWTUPLE_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct FlowtupleConfig {
    /// How input files are opened.
    #[validate(nested)]
    #[serde(default)]
    pub input: InputConfig,

    /// What the tools print.
    #[validate(nested)]
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging, diagnostics and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl FlowtupleConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/flowtuple.yaml`, if present
    /// 3. `config/<FLOWTUPLE_ENV>.yaml`, if `FLOWTUPLE_ENV` is set and the file exists
    /// 4. `FLOWTUPLE_*` environment variables (`__` separates nested keys)
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FlowtupleConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            tracing::debug!("{} not found, using default configuration", BASE_FILE);
        }

        if let Ok(env) = std::env::var("FLOWTUPLE_ENV") {
            let env_file = format!("config/{}.yaml", env);
            if Path::new(&env_file).exists() {
                figment = figment.merge(Yaml::file(env_file));
            }
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file, on top of defaults and
    /// below environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment = Figment::from(Serialized::defaults(FlowtupleConfig::default()))
            .merge(Yaml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["env"]).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
