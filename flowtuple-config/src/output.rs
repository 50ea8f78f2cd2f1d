//! Output configuration for the command-line front end.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct OutputConfig {
    /// What `dump` prints: only records, or every framing event.
    #[validate(custom(function = validation::validate_format))]
    #[serde(default = "default_format")]
    pub format: String,

    /// Stop after this many records.
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u64>,
}

fn default_format() -> String {
    "records".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            limit: None,
        }
    }
}
