//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around raw values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A Best Buy API key.
///
/// The key is appended to every request URI as the `apiKey` query
/// parameter. An empty key is accepted; the API answers such requests with
/// an authorization error rather than the client refusing to send them.
///
/// # Security
///
/// The `Debug` implementation masks the key, displaying only
/// `ApiKey(*****)`, since request URIs embed it in clear text.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::ApiKey;
///
/// let key = ApiKey::new("my-api-key");
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{key:?}"), "ApiKey(*****)");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new API key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns `true` if no key was provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated API base URI, e.g. `https://api.bestbuy.com/v1`.
///
/// Trailing slashes are stripped so that resource paths can be appended
/// with a single `/`.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::ApiBase;
///
/// let base = ApiBase::new("http://localhost:8080/v1/").unwrap();
/// assert_eq!(base.as_ref(), "http://localhost:8080/v1");
/// assert_eq!(base.scheme(), "http");
/// assert_eq!(base.host_name(), "localhost");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiBase {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl ApiBase {
    /// Creates a new validated API base.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] if the URL has no scheme or host,
    /// or carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidApiBase { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        if url.contains(['?', '#']) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Returns `true` if requests to this base would carry the API key over
    /// plain HTTP to a host other than the local machine.
    #[must_use]
    pub fn exposes_key(&self) -> bool {
        self.scheme().eq_ignore_ascii_case("http")
            && !matches!(self.host_name(), "localhost" | "127.0.0.1")
    }
}

impl AsRef<str> for ApiBase {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for ApiBase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for ApiBase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// How long to wait for a response to an API call, in whole seconds.
///
/// Conversions accept any numeric input that denotes a positive integer,
/// including floats with no fractional part (`30.0`), and decimal strings.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::TimeoutSeconds;
///
/// assert_eq!(TimeoutSeconds::try_from(30.0).unwrap().get(), 30);
/// assert!(TimeoutSeconds::try_from(2.5).is_err());
/// assert!(TimeoutSeconds::try_from(-1_i64).is_err());
/// assert!("abc".parse::<TimeoutSeconds>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeoutSeconds(u64);

impl TimeoutSeconds {
    /// Default timeout applied when none is configured.
    pub const DEFAULT: Self = Self(10);

    /// Returns the timeout in seconds.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }

    fn invalid(value: impl fmt::Display) -> ConfigError {
        ConfigError::InvalidTimeout {
            value: value.to_string(),
        }
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for TimeoutSeconds {
    type Error = ConfigError;

    fn try_from(seconds: u64) -> Result<Self, Self::Error> {
        if seconds == 0 {
            return Err(Self::invalid(seconds));
        }
        Ok(Self(seconds))
    }
}

impl TryFrom<i64> for TimeoutSeconds {
    type Error = ConfigError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        u64::try_from(seconds)
            .map_err(|_| Self::invalid(seconds))
            .and_then(Self::try_from)
    }
}

impl TryFrom<i32> for TimeoutSeconds {
    type Error = ConfigError;

    fn try_from(seconds: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(seconds))
    }
}

impl TryFrom<f64> for TimeoutSeconds {
    type Error = ConfigError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        // u64::MAX as f64 rounds up, so the bound is exclusive
        if !seconds.is_finite()
            || seconds <= 0.0
            || seconds.fract() != 0.0
            || seconds >= u64::MAX as f64
        {
            return Err(Self::invalid(seconds));
        }
        Ok(Self(seconds as u64))
    }
}

impl FromStr for TimeoutSeconds {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(seconds) = trimmed.parse::<u64>() {
            return Self::try_from(seconds);
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| Self::invalid(s))
            .and_then(Self::try_from)
    }
}

impl TryFrom<&str> for TimeoutSeconds {
    type Error = ConfigError;

    fn try_from(seconds: &str) -> Result<Self, Self::Error> {
        seconds.parse()
    }
}

/// Ceiling on the number of requests a client starts per wall-clock second.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::RequestsPerSecond;
///
/// assert_eq!(RequestsPerSecond::default().get(), 5);
/// assert!(RequestsPerSecond::new(0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestsPerSecond(u32);

impl RequestsPerSecond {
    /// Default ceiling applied when none is configured.
    pub const DEFAULT: Self = Self(5);

    /// Creates a new requests-per-second ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRequestsPerSecond`] if `limit` is zero.
    pub fn new(limit: u32) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidRequestsPerSecond {
                value: limit.to_string(),
            });
        }
        Ok(Self(limit))
    }

    /// Returns the ceiling.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for RequestsPerSecond {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for RequestsPerSecond {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidRequestsPerSecond {
                value: s.to_string(),
            })
            .and_then(Self::new)
    }
}
