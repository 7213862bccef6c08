//! Configuration file handling
//!
//! Loads the optional ~/.config/boardline/config.yaml. Every field has a
//! default, so a missing file simply means default settings. The API token is
//! never stored in the file; it is resolved from an environment variable at
//! startup and its absence is fatal.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// boardline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GraphQL endpoint of the platform
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Cached query responses expire after this many seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached responses before the oldest is evicted
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Maximum in-flight requests during a bulk column update
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Page limit when fetching board items
    #[serde(default = "default_item_limit")]
    pub item_limit: u32,

    /// Board name used by the todo commands when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_board: Option<String>,
}

fn default_api_url() -> String {
    "https://api.monday.com/v2".to_string()
}

fn default_token_env() -> String {
    "MONDAY_API_TOKEN".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    10
}

fn default_cache_capacity() -> usize {
    256
}

fn default_batch_concurrency() -> usize {
    5
}

fn default_item_limit() -> u32 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            batch_concurrency: default_batch_concurrency(),
            item_limit: default_item_limit(),
            todo_board: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no config file exists.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::BoardlineError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Default config file path (~/.config/boardline/config.yaml)
    pub fn default_path() -> PathBuf {
        // Always use ~/.config for consistency across platforms (macOS, Linux)
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("boardline");
        path.push("config.yaml");
        path
    }

    /// Resolve the API token from the configured environment variable.
    ///
    /// A missing or empty token is a fatal configuration error.
    pub fn resolve_token(&self) -> Result<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(crate::BoardlineError::Config(format!(
                "{} is required in the environment",
                self.token_env
            ))),
        }
    }
}
