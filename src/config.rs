//! Configuration for huf-compress

use crate::error::{CompressError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub max_input_size: usize,
    pub atomic_write: bool,
    pub verify_after_encode: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_size: 1024 * 1024 * 1024, // 1 GiB
            atomic_write: true,
            verify_after_encode: false,
        }
    }
}

impl CodecConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompressError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CompressError::Config(e.to_string()))
    }

    pub(crate) fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_input_size {
            return Err(CompressError::InputTooLarge {
                size,
                limit: self.max_input_size,
            });
        }
        Ok(())
    }
}
