//! Startup configuration of the gateway.

use reqwest::Url;

/// Environment variable holding the base URL of the hosted service.
pub const STORE_URL_ENV: &str = "BRANDKIT_STORE_URL";

/// Environment variable holding the anonymous access key.
pub const STORE_ANON_KEY_ENV: &str = "BRANDKIT_STORE_ANON_KEY";

/// Fatal configuration errors. The gateway cannot be built without both
/// values, and there is nothing to recover to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required value is absent or empty.
    #[error("missing required configuration value {0}")]
    Missing(&'static str),

    /// The base URL does not parse.
    #[error("invalid store URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Endpoint and access key of the hosted service.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    base: String,
    anon_key: String,
}

impl GatewayConfig {
    /// Validates and builds a configuration.
    ///
    /// Both values must be non-empty and `url` must be an absolute URL.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let anon_key = anon_key.into();

        if url.trim().is_empty() {
            return Err(ConfigError::Missing(STORE_URL_ENV));
        }
        if anon_key.trim().is_empty() {
            return Err(ConfigError::Missing(STORE_ANON_KEY_ENV));
        }

        Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
            value: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    /// Reads `BRANDKIT_STORE_URL` and `BRANDKIT_STORE_ANON_KEY` from the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the two values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(STORE_URL_ENV).ok_or(ConfigError::Missing(STORE_URL_ENV))?;
        let anon_key = lookup(STORE_ANON_KEY_ENV).ok_or(ConfigError::Missing(STORE_ANON_KEY_ENV))?;
        Self::new(url, anon_key)
    }

    /// The base URL without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base
    }

    /// The anonymous access key.
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Joins `path` (which must not start with `/`) onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, brandkit_core::ClientError> {
        Url::parse(&format!("{}/{}", self.base, path))
            .map_err(|e| brandkit_core::ClientError::Unknown(format!("invalid endpoint {path}: {e}")))
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.base)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}
