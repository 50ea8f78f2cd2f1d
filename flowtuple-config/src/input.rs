//! Input stream configuration.
//!
//! Controls how a flowtuple file is opened before it reaches the decoder.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::validation;

/// Input configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct InputConfig {
    /// Compression of the input file (auto, gzip, none).
    #[validate(custom(function = validation::validate_compression))]
    #[serde(default = "default_compression")]
    pub compression: String,

    /// Read buffer size in bytes.
    #[validate(range(min = 512, max = 16777216))]
    #[serde(default = "default_buffer_size", deserialize_with = "deserialize_size")]
    pub buffer_size: usize,
}

fn default_compression() -> String {
    "auto".into()
}

fn default_buffer_size() -> usize {
    65536
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            buffer_size: default_buffer_size(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Num(usize),
    Str(String),
}

/// Accepts either a plain number of bytes or a human-friendly size ("64KiB").
fn deserialize_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Num(n) => Ok(n),
        SizeValue::Str(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (num_part, unit_part) = s.split_at(split);
    let number: f64 = num_part
        .parse()
        .map_err(|_| format!("invalid size '{s}'"))?;
    let multiplier = match unit_part.trim().to_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" | "kib" => 1024.0,
        "mb" | "mib" => 1024.0 * 1024.0,
        _ => return Err(format!("unknown size unit in '{s}'")),
    };
    Ok((number * multiplier) as usize)
}
