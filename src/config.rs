//! Configuration for huffpack

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Strip trailing whitespace from text before encoding it.
    pub trim_trailing_whitespace: bool,
    /// Upper bound on the number of symbols accepted by one encode call.
    pub max_input_size: usize,
    /// Reject streams whose pad bits are not all zero.
    pub verify_padding: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            trim_trailing_whitespace: true,
            max_input_size: 100 * 1024 * 1024, // 100 MiB
            verify_padding: true,
        }
    }
}

impl CodecConfig {
    /// Parse a JSON document. Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CodecError::Config(e.to_string()))?;
        if config.max_input_size == 0 {
            return Err(CodecError::Config("max_input_size must be non-zero".into()));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CodecError::Config(e.to_string()))
    }
}
