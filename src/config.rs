use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the configured API key
pub const API_KEY_ENV: &str = "INBOX_SYNC_API_KEY";

/// Environment variable overriding the configured GraphQL endpoint
pub const ENDPOINT_ENV: &str = "INBOX_SYNC_ENDPOINT";

/// Settings for one sync session
///
/// Values are read once and passed explicitly to every operation; nothing in
/// the crate mutates a config after it has been handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Raw API key sent in the `Authorization` header
    #[serde(default)]
    pub api_key: String,

    /// Directory that receives the generated HTML files
    pub directory: PathBuf,

    /// GraphQL endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of articles requested per search page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Search filter used for listing
    #[serde(default = "default_search_query")]
    pub search_query: String,

    /// Upper bound on pages fetched in one listing
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

/// Default GraphQL endpoint
fn default_endpoint() -> String {
    "https://api-prod.omnivore.app/api/graphql".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    20
}

/// Newest saved first, inbox only
fn default_search_query() -> String {
    "sort:saved-desc in:inbox".to_string()
}

fn default_max_pages() -> usize {
    500
}

impl SyncConfig {
    /// Create a new configuration with default values
    pub fn new(api_key: &str, directory: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.to_string(),
            directory: directory.into(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            search_query: default_search_query(),
            max_pages: default_max_pages(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            SyncError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            SyncError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        serde_json::from_str(json).map_err(|e| SyncError::Config(format!("invalid config: {}", e)))
    }

    /// Persist the configuration as pretty JSON, creating the parent directory
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SyncError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SyncError::filesystem(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::Config(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, json).map_err(|e| SyncError::filesystem(path, e))?;

        ::log::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Apply `INBOX_SYNC_API_KEY` / `INBOX_SYNC_ENDPOINT` when they are set and non-empty
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(ENDPOINT_ENV).ok(),
        )
    }

    fn with_overrides(mut self, api_key: Option<String>, endpoint: Option<String>) -> Self {
        if let Some(api_key) = api_key.filter(|v| !v.is_empty()) {
            self.api_key = api_key;
        }
        if let Some(endpoint) = endpoint.filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
