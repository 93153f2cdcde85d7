//! Configuration loaded from the process environment.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};

pub const SEARCH_ENDPOINT: &str = "SEARCH_ENDPOINT";
pub const SEARCH_INDEX_NAME: &str = "SEARCH_INDEX_NAME";
pub const SEARCH_API_KEY: &str = "SEARCH_API_KEY";
pub const AOAI_ENDPOINT: &str = "AOAI_ENDPOINT";
pub const AOAI_API_KEY: &str = "AOAI_API_KEY";
pub const AOAI_DEPLOYMENT: &str = "AOAI_DEPLOYMENT";

/// Every variable `/ask` needs, in the order they are checked.
pub const REQUIRED_KEYS: [&str; 6] = [
    SEARCH_ENDPOINT,
    SEARCH_INDEX_NAME,
    SEARCH_API_KEY,
    AOAI_ENDPOINT,
    AOAI_API_KEY,
    AOAI_DEPLOYMENT,
];

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Endpoints and credentials for the search index and the model deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub search_endpoint: String,
    pub search_index_name: String,
    pub search_api_key: String,
    pub aoai_endpoint: String,
    pub aoai_api_key: String,
    pub aoai_deployment: String,
}

impl Settings {
    /// Read all six variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::MissingConfiguration(key.to_string()))
        };

        Ok(Self {
            search_endpoint: require(SEARCH_ENDPOINT)?,
            search_index_name: require(SEARCH_INDEX_NAME)?,
            search_api_key: require(SEARCH_API_KEY)?,
            aoai_endpoint: require(AOAI_ENDPOINT)?,
            aoai_api_key: require(AOAI_API_KEY)?,
            aoai_deployment: require(AOAI_DEPLOYMENT)?,
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("search_endpoint", &self.search_endpoint)
            .field("search_index_name", &self.search_index_name)
            .field("search_api_key", &"<redacted>")
            .field("aoai_endpoint", &self.aoai_endpoint)
            .field("aoai_api_key", &"<redacted>")
            .field("aoai_deployment", &self.aoai_deployment)
            .finish()
    }
}

/// Where a request gets its [`Settings`] from.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// Re-read the process environment on every load, so edits apply to the next request.
    Environment,
    /// Always hand out the same injected settings.
    Fixed(Settings),
    /// Validate a captured set of variables on every load.
    Vars(HashMap<String, String>),
}

impl SettingsSource {
    pub fn load(&self) -> Result<Settings> {
        match self {
            SettingsSource::Environment => Settings::from_env(),
            SettingsSource::Fixed(settings) => Ok(settings.clone()),
            SettingsSource::Vars(vars) => Settings::from_lookup(|key| vars.get(key).cloned()),
        }
    }
}

/// Diagnostic view of the configuration served at `/debug/env`.
///
/// Endpoints and names are reported verbatim; API keys only as presence flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    #[serde(rename = "SEARCH_ENDPOINT")]
    pub search_endpoint: Option<String>,
    #[serde(rename = "SEARCH_INDEX_NAME")]
    pub search_index_name: Option<String>,
    #[serde(rename = "SEARCH_API_KEY_set")]
    pub search_api_key_set: bool,
    #[serde(rename = "AOAI_ENDPOINT")]
    pub aoai_endpoint: Option<String>,
    #[serde(rename = "AOAI_DEPLOYMENT")]
    pub aoai_deployment: Option<String>,
    #[serde(rename = "AOAI_API_KEY_set")]
    pub aoai_api_key_set: bool,
}

impl ConfigReport {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
        Self {
            search_endpoint: lookup(SEARCH_ENDPOINT),
            search_index_name: lookup(SEARCH_INDEX_NAME),
            search_api_key_set: is_set(SEARCH_API_KEY),
            aoai_endpoint: lookup(AOAI_ENDPOINT),
            aoai_deployment: lookup(AOAI_DEPLOYMENT),
            aoai_api_key_set: is_set(AOAI_API_KEY),
        }
    }
}

/// Process-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Upper bound on each upstream call. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            upstream_timeout: Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.into());

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let timeout_secs = lookup("UPSTREAM_TIMEOUT_SECS")
            .and_then(|t| t.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Self {
            host,
            port,
            upstream_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Populate the process environment from a `.env` file if one exists.
///
/// Returns the file that was applied, or `None` when there is no `.env`.
/// Variables already set in the process win over the file.
pub fn load_dotenv() -> std::result::Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
