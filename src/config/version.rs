//! Best Buy API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for selecting which
//! generation of the Best Buy catalog API to talk to.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Best Buy catalog API generation.
///
/// Both generations expose the same `products`/`stores` resources and the
/// same query grammar; they differ in their entry point.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::ApiVersion;
///
/// let version = ApiVersion::latest();
/// assert_eq!(version.base_uri(), "https://api.bestbuy.com/v1");
///
/// let version: ApiVersion = "remix".parse().unwrap();
/// assert_eq!(version, ApiVersion::Remix);
/// assert!(version.is_deprecated());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    /// The first-generation Remix API at `api.remix.bestbuy.com`.
    Remix,
    /// The BBYOpen API at `api.bestbuy.com`.
    #[default]
    BbyOpen,
}

impl ApiVersion {
    /// Returns the most recent API generation.
    #[must_use]
    pub const fn latest() -> Self {
        Self::BbyOpen
    }

    /// Returns the entry point for all API requests of this generation.
    #[must_use]
    pub const fn base_uri(&self) -> &'static str {
        match self {
            Self::Remix => "http://api.remix.bestbuy.com/v1",
            Self::BbyOpen => "https://api.bestbuy.com/v1",
        }
    }

    /// Returns `true` if this generation has been superseded.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        matches!(self, Self::Remix)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version_str = match self {
            Self::Remix => "remix",
            Self::BbyOpen => "bbyopen",
        };
        f.write_str(version_str)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "remix" => Ok(Self::Remix),
            "bbyopen" | "v1" => Ok(Self::BbyOpen),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
