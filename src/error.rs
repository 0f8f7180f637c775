//! Error types for the Best Buy API client.
//!
//! This module contains the configuration errors raised while building a
//! [`BestBuyConfig`](crate::BestBuyConfig) or changing client settings.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use bestbuy_api::{ConfigError, TimeoutSeconds};
//!
//! let result = TimeoutSeconds::try_from(0_u64);
//! assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant carries the rejected input so the message can name it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Timeout is not a positive whole number of seconds.
    #[error("Timeout ({value}) must be a positive integer number of seconds.")]
    InvalidTimeout {
        /// The rejected timeout, as given.
        value: String,
    },

    /// Requests-per-second ceiling is not usable.
    #[error("Requests per second ({value}) must be a positive integer.")]
    InvalidRequestsPerSecond {
        /// The rejected limit, as given.
        value: String,
    },

    /// API base URI is invalid.
    #[error("Invalid API base '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.bestbuy.com/v1').")]
    InvalidApiBase {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected 'remix' or 'bbyopen'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },
}
