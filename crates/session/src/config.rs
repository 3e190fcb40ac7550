//! Identity configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `IDENTITY_CDN_PREFIX` - Image host prefix prepended to bare icon ids
//!   (default: the production Cloudinary upload URL)
//! - `IDENTITY_DEFAULT_ICON` - Relative path of the logged-out profile icon
//!   (default: `imgs/profileIconLoggedOut.png`)
//! - `IDENTITY_BASE_URL` - Public URL of the site; `https://` enables secure cookies
//!   (default: `http://localhost:3000`)
//! - `IDENTITY_COOKIE_NAME` - Session cookie name (default: `sid`)

use thiserror::Error;
use url::Url;

use crate::icon::{CDN_PREFIX, DEFAULT_ICON};

/// Default public base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default session cookie name.
const DEFAULT_COOKIE_NAME: &str = "sid";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Identity layer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Image host prefix, always ending in `/`
    pub cdn_prefix: String,
    /// Relative path of the default (logged-out) icon
    pub default_icon: String,
    /// Public base URL of the site
    pub base_url: String,
    /// Session cookie name
    pub cookie_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            cdn_prefix: CDN_PREFIX.to_string(),
            default_icon: DEFAULT_ICON.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl IdentityConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cdn_prefix = get("IDENTITY_CDN_PREFIX", CDN_PREFIX);
        validate_cdn_prefix(&cdn_prefix)?;

        let default_icon = get("IDENTITY_DEFAULT_ICON", DEFAULT_ICON);
        validate_default_icon(&default_icon)?;

        let base_url = get("IDENTITY_BASE_URL", DEFAULT_BASE_URL);
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("IDENTITY_BASE_URL".to_string(), e.to_string())
        })?;

        let cookie_name = get("IDENTITY_COOKIE_NAME", DEFAULT_COOKIE_NAME);
        if cookie_name.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "IDENTITY_COOKIE_NAME".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            cdn_prefix,
            default_icon,
            base_url,
            cookie_name,
        })
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn validate_cdn_prefix(prefix: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar("IDENTITY_CDN_PREFIX".to_string(), reason.to_string())
    };

    let url = Url::parse(prefix).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("must be an http or https URL"));
    }
    if !prefix.ends_with('/') {
        return Err(invalid("must end with '/'"));
    }
    Ok(())
}

fn validate_default_icon(path: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar("IDENTITY_DEFAULT_ICON".to_string(), reason.to_string())
    };

    if path.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if path.starts_with('/') {
        return Err(invalid("must be a relative path"));
    }
    Ok(())
}
