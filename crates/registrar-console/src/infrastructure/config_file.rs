//! TOML configuration file for the console.
//!
//! Every key is optional; keys that are present override the defaults and
//! are in turn overridden by command-line flags.
//!
//! ```toml
//! server_url = "https://registrar.example"
//! client_id = "jartine"
//! xsrf_token = "☢"
//! trid_prefix = "asdf"
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::ConsoleConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The file's contents.  Unknown keys are rejected so typos surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xsrf_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trid_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl ConfigFile {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read (a missing file is
    /// an error too, since the path was given explicitly) and
    /// [`ConfigError::Parse`] when the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Overwrites the fields of `config` that this file sets.
    pub fn apply_to(self, config: &mut ConsoleConfig) {
        if let Some(server_url) = self.server_url {
            config.server_url = server_url;
        }
        if let Some(client_id) = self.client_id {
            config.client_id = client_id;
        }
        if let Some(xsrf_token) = self.xsrf_token {
            config.xsrf_token = xsrf_token;
        }
        if self.password.is_some() {
            config.password = self.password;
        }
        if let Some(trid_prefix) = self.trid_prefix {
            config.trid_prefix = trid_prefix;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
