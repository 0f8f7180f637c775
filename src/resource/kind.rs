//! Resource kinds and response formats.

use crate::resource::errors::TargetError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Format string for XML responses.
pub const FORMAT_XML: &str = "xml";

/// Format string for JSON responses.
pub const FORMAT_JSON: &str = "json";

/// The kinds of resource the catalog API serves.
///
/// Store availability is queried by targeting both kinds in one request.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::ResourceKind;
///
/// let kind: ResourceKind = " Products ".parse().unwrap();
/// assert_eq!(kind, ResourceKind::Products);
/// assert_eq!(kind.as_str(), "products");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Products, addressed by SKU.
    Products,
    /// Stores, addressed by store ID.
    Stores,
}

impl ResourceKind {
    /// Returns the path name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Stores => "stores",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "products" => Ok(Self::Products),
            "stores" => Ok(Self::Stores),
            _ => Err(TargetError::InvalidKind { kind: s }),
        }
    }
}

/// Response document format.
///
/// Only individually addressed resources carry a format in their path;
/// collection queries ignore it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    /// XML documents (the API default).
    #[default]
    Xml,
    /// JSON documents.
    Json,
}

impl ResponseFormat {
    /// Returns the file extension used in resource paths.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => FORMAT_XML,
            Self::Json => FORMAT_JSON,
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            FORMAT_XML => Ok(Self::Xml),
            FORMAT_JSON => Ok(Self::Json),
            _ => Err(TargetError::InvalidFormat { format: s }),
        }
    }
}

macro_rules! impl_serde_via_str {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

impl_serde_via_str!(ResourceKind);
impl_serde_via_str!(ResponseFormat);
