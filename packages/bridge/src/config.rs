//! Bridge configuration.

use std::fs;
use std::path::{Path, PathBuf};

use classbridge_core::ScanConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Package searched for targets when a request names no `path`.
pub const DEFAULT_TARGET_PATH: &str = "/Game/Blueprints";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    pub default_target_path: String,
    pub scan: ScanConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_target_path: DEFAULT_TARGET_PATH.to_string(),
            scan: ScanConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BridgeConfig {
    /// Load a JSON config file. Keys left out keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Reading config {}...", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
