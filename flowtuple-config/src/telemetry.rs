//! Observability configuration.
//!
//! Parameters for:
//! - Log level of the tracing subscriber
//! - Decoder diagnostics (interval and class details)
//! - Metrics output

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Default log level; `RUST_LOG` takes precedence.
    #[validate(custom(function = validation::validate_log_level))]
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit decoder diagnostics through tracing.
    #[serde(default)]
    pub diagnostics: bool,

    /// Write decoder diagnostics to this file instead of tracing.
    #[serde(default)]
    pub diagnostics_file: Option<PathBuf>,

    /// Print prometheus metrics after a run.
    #[serde(default)]
    pub metrics: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            diagnostics: false,
            diagnostics_file: None,
            metrics: false,
        }
    }
}
