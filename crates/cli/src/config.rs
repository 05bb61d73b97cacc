//! CLI configuration
//!
//! Read from a TOML file: `--config <path>` if given, otherwise
//! `formforge.toml` in the working directory when it exists. Every key is
//! optional.
//!
//! ```toml
//! store_dir = "forms"
//! log_level = "info"
//! pretty = true
//! ```

use formforge_core::{BuilderError, BuilderResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "formforge.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory holding `<form-id>.form.json` files
    pub store_dir: PathBuf,

    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("forms"),
            log_level: "warn".to_string(),
            pretty: true,
        }
    }
}

impl CliConfig {
    /// Load the configuration
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> BuilderResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> BuilderResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| BuilderError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| {
            BuilderError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> BuilderResult<Self> {
        toml::from_str(content).map_err(|e| BuilderError::InvalidConfig(e.to_string()))
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> BuilderResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BuilderError::InvalidConfig(e.to_string()))?;
        fs::write(path, content).map_err(|e| BuilderError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply a store directory given on the command line or via env
    pub fn with_store_dir(mut self, store_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = store_dir {
            self.store_dir = dir;
        }
        self
    }
}
