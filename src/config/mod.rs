//! Configuration types for the Best Buy API client.
//!
//! This module provides the core configuration types used to initialize
//! a [`BestBuyClient`](crate::BestBuyClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`BestBuyConfig`]: The main configuration struct holding all client settings
//! - [`BestBuyConfigBuilder`]: A builder for constructing [`BestBuyConfig`] instances
//! - [`ApiKey`]: The API key, masked in debug output
//! - [`ApiBase`]: A validated API entry point overriding the version default
//! - [`ApiVersion`]: The API generation to use
//! - [`TimeoutSeconds`] and [`RequestsPerSecond`]: validated request limits
//!
//! # Example
//!
//! ```rust
//! use bestbuy_api::{BestBuyConfig, ApiKey, ApiVersion};
//!
//! let config = BestBuyConfig::builder()
//!     .api_key(ApiKey::new("my-api-key"))
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_base(), "https://api.bestbuy.com/v1");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiBase, ApiKey, RequestsPerSecond, TimeoutSeconds};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "BESTBUY_API_KEY";
/// Environment variable overriding the API entry point.
pub const ENV_API_URI: &str = "BESTBUY_API_URI";
/// Environment variable selecting the API generation.
pub const ENV_API_VERSION: &str = "BESTBUY_API_VERSION";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "BESTBUY_TIMEOUT";
/// Environment variable holding the requests-per-second ceiling.
pub const ENV_REQUESTS_PER_SECOND: &str = "BESTBUY_REQUESTS_PER_SECOND";

/// Configuration for the Best Buy API client.
///
/// # Thread Safety
///
/// `BestBuyConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks. Each client built from it keeps its own
/// request state.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::{BestBuyConfig, ApiKey, ApiBase};
///
/// let config = BestBuyConfig::builder()
///     .api_key(ApiKey::new("key"))
///     .api_base(ApiBase::new("http://localhost:8080/v1").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.api_base(), "http://localhost:8080/v1");
/// ```
#[derive(Clone, Debug)]
pub struct BestBuyConfig {
    api_key: ApiKey,
    api_version: ApiVersion,
    api_base: Option<ApiBase>,
    timeout: TimeoutSeconds,
    requests_per_second: RequestsPerSecond,
    user_agent_prefix: Option<String>,
}

impl BestBuyConfig {
    /// Creates a new builder for constructing a `BestBuyConfig`.
    #[must_use]
    pub fn builder() -> BestBuyConfigBuilder {
        BestBuyConfigBuilder::new()
    }

    /// Builds a configuration from `BESTBUY_*` environment variables.
    ///
    /// Unset variables fall back to the builder defaults. See
    /// [`ENV_API_KEY`], [`ENV_API_URI`], [`ENV_API_VERSION`],
    /// [`ENV_TIMEOUT`] and [`ENV_REQUESTS_PER_SECOND`].
    ///
    /// # Errors
    ///
    /// Returns the matching [`ConfigError`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// This is what [`from_env`](Self::from_env) uses; it is exposed so that
    /// settings can come from any key/value source.
    ///
    /// # Errors
    ///
    /// Returns the matching [`ConfigError`] if a value is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(key) = lookup(ENV_API_KEY) {
            builder = builder.api_key(ApiKey::new(key));
        }
        if let Some(uri) = lookup(ENV_API_URI) {
            builder = builder.api_base(ApiBase::new(uri)?);
        }
        if let Some(version) = lookup(ENV_API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            builder = builder.timeout(timeout.parse()?);
        }
        if let Some(limit) = lookup(ENV_REQUESTS_PER_SECOND) {
            builder = builder.requests_per_second(limit.parse()?);
        }

        builder.build()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the entry point for API requests.
    ///
    /// This is the configured override if one was set, otherwise the
    /// version's default base.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_ref()
            .map_or_else(|| self.api_version.base_uri(), |base| base.as_ref())
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> TimeoutSeconds {
        self.timeout
    }

    /// Returns the requests-per-second ceiling.
    #[must_use]
    pub const fn requests_per_second(&self) -> RequestsPerSecond {
        self.requests_per_second
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify BestBuyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BestBuyConfig>();
};

/// Builder for constructing [`BestBuyConfig`] instances.
///
/// # Defaults
///
/// - `api_key`: empty
/// - `api_version`: Latest ([`ApiVersion::BbyOpen`])
/// - `api_base`: `None` (use the version's base)
/// - `timeout`: 10 seconds
/// - `requests_per_second`: 5
/// - `user_agent_prefix`: `None`
///
/// # Example
///
/// ```rust
/// use bestbuy_api::{BestBuyConfig, ApiKey, ApiVersion, TimeoutSeconds, RequestsPerSecond};
///
/// let config = BestBuyConfig::builder()
///     .api_key(ApiKey::new("key"))
///     .api_version(ApiVersion::Remix)
///     .timeout(TimeoutSeconds::try_from(30_u64).unwrap())
///     .requests_per_second(RequestsPerSecond::new(2).unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct BestBuyConfigBuilder {
    api_key: Option<ApiKey>,
    api_version: Option<ApiVersion>,
    api_base: Option<ApiBase>,
    timeout: Option<TimeoutSeconds>,
    requests_per_second: Option<RequestsPerSecond>,
    user_agent_prefix: Option<String>,
}

impl BestBuyConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Overrides the API entry point (e.g. for a proxy or a local stub).
    #[must_use]
    pub fn api_base(mut self, base: ApiBase) -> Self {
        self.api_base = Some(base);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: TimeoutSeconds) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the requests-per-second ceiling.
    #[must_use]
    pub const fn requests_per_second(mut self, limit: RequestsPerSecond) -> Self {
        self.requests_per_second = Some(limit);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`BestBuyConfig`].
    ///
    /// # Errors
    ///
    /// Currently infallible: every field is validated when its newtype is
    /// constructed. The `Result` keeps the signature stable for settings
    /// that depend on each other.
    #[allow(clippy::unnecessary_wraps)]
    pub fn build(self) -> Result<BestBuyConfig, ConfigError> {
        let api_version = self.api_version.unwrap_or_else(ApiVersion::latest);
        if api_version.is_deprecated() {
            tracing::warn!(
                "The {} API generation is deprecated; consider {}",
                api_version,
                ApiVersion::latest()
            );
        }

        if let Some(base) = &self.api_base {
            tracing::debug!("Using API base {} for {}", base, api_version);
            if base.exposes_key() {
                tracing::warn!(
                    "API base host {} is not HTTPS; the API key will be sent in clear text",
                    base.host_name()
                );
            }
        }

        Ok(BestBuyConfig {
            api_key: self.api_key.unwrap_or_default(),
            api_version,
            api_base: self.api_base,
            timeout: self.timeout.unwrap_or_default(),
            requests_per_second: self.requests_per_second.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
