//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `QUICK_BITES_API_URL` - Remote API base URL (default: `http://localhost:3000`)
//! - `QUICK_BITES_STORAGE_DIR` - Durable client storage directory (default: `.quick-bites`)
//! - `QUICK_BITES_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `QUICK_BITES_DEFAULT_THEME` - `light` or `dark` (default: `light`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use quick_bites_core::Theme;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API gateway.
    pub api_base_url: Url,
    /// Directory holding the durable client storage files.
    pub storage_dir: PathBuf,
    /// Timeout applied to every remote request.
    pub request_timeout: Duration,
    /// Theme applied when no persisted preference exists.
    pub default_theme: Theme,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("QUICK_BITES_API_URL", "http://localhost:3000");
        let api_base_url = Url::parse(&api_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("QUICK_BITES_API_URL".to_owned(), e.to_string()))?;

        let storage_dir = PathBuf::from(get_env_or_default("QUICK_BITES_STORAGE_DIR", ".quick-bites"));

        let request_timeout = get_env_or_default("QUICK_BITES_REQUEST_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("QUICK_BITES_REQUEST_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        let default_theme = get_env_or_default("QUICK_BITES_DEFAULT_THEME", "light")
            .parse::<Theme>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("QUICK_BITES_DEFAULT_THEME".to_owned(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            storage_dir,
            request_timeout,
            default_theme,
        })
    }

    /// Base URL with any trailing slash trimmed, ready for path concatenation.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.api_base_url.as_str().trim_end_matches('/').to_owned()
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
