//! spec configuration
//!
//! Read from ~/.config/podkit/spec.yaml (or `--config`). Every field has a
//! default so the file is optional.

use anyhow::Result;
use podkit_core::Paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpConfig;

/// Environment variable overriding `network.token`
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Top-level spec configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecConfig {
    /// Where remote lint targets are downloaded
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub validator: ValidatorConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// GitHub API and download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// API token, raises the GitHub rate limit
    #[serde(default)]
    pub token: Option<String>,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            token: None,
        }
    }
}

/// External validator command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    #[serde(default = "default_validator_timeout")]
    pub timeout_secs: u64,

    /// Root of the per-spec validation directories
    #[serde(default)]
    pub validation_root: Option<PathBuf>,
}

fn default_program() -> String {
    "pod".to_string()
}

fn default_args() -> Vec<String> {
    vec!["lib".to_string(), "lint".to_string()]
}

fn default_validator_timeout() -> u64 {
    900
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: default_validator_timeout(),
            validation_root: None,
        }
    }
}

/// Local spec repositories searched by `cat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub repos_dir: Option<PathBuf>,
}

impl SpecConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        let paths = Paths::new();
        Self::load_from(&paths.config_file("spec"))
    }

    /// Load from a specific path, applying environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Self = podkit_core::config::load_or_default(path)?;
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.network.token = Some(token);
            }
        }
        Ok(config)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| Paths::new().lint_downloads())
    }

    pub fn validation_root(&self) -> PathBuf {
        self.validator
            .validation_root
            .clone()
            .unwrap_or_else(|| Paths::new().validation_root())
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.index
            .repos_dir
            .clone()
            .unwrap_or_else(|| Paths::new().spec_repos())
    }

    pub fn validator_timeout(&self) -> Duration {
        Duration::from_secs(self.validator.timeout_secs)
    }

    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.network.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.network.request_timeout_secs),
            ..HttpConfig::default()
        }
    }
}
