//! Custom validation functions for configuration.

use validator::ValidationError;

fn matches(pattern: &str, value: &str, code: &'static str) -> Result<(), ValidationError> {
    let re = regex::Regex::new(pattern).map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

/// Validate input compression mode.
pub fn validate_compression(mode: &str) -> Result<(), ValidationError> {
    matches("^(auto|gzip|none)$", mode, "invalid_compression")
}

/// Validate output format.
pub fn validate_format(format: &str) -> Result<(), ValidationError> {
    matches("^(records|events)$", format, "invalid_output_format")
}

/// Validate a tracing level name (case-insensitive).
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    matches(
        "^(trace|debug|info|warn|error)$",
        &level.to_lowercase(),
        "invalid_log_level",
    )
}
