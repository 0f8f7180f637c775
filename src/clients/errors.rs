//! Query and transport error types.
//!
//! # Error Handling
//!
//! Only caller mistakes surface as errors from a query:
//!
//! - [`QueryError::NoTarget`]: no products or stores were targeted
//! - [`QueryError::InvalidTarget`]: a target could not be built
//!
//! Network failures and HTTP error statuses are *data*: the client folds a
//! [`TransportError`] into a [`Response`](crate::Response) with an empty body
//! and `http_code` of `0`, which the caller inspects with
//! [`Response::is_error`](crate::Response::is_error) and
//! [`Response::get`](crate::Response::get).
//!
//! # Example
//!
//! ```rust,ignore
//! use bestbuy_api::{BestBuyClient, QueryError};
//!
//! match client.query().await {
//!     Ok(response) if response.is_error() => {
//!         println!("API error: {:?}", response.status_code());
//!     }
//!     Ok(response) => println!("{}", response),
//!     Err(QueryError::NoTarget) => println!("nothing to query"),
//!     Err(e) => println!("invalid query: {}", e),
//! }
//! ```

use crate::resource::TargetError;
use thiserror::Error;

/// Errors that prevent a query from being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No resource was targeted.
    #[error("At least one resource (e.g. products) must be targeted to perform an API query")]
    NoTarget,

    /// A resource target was rejected.
    #[error(transparent)]
    InvalidTarget(#[from] TargetError),
}

/// Errors reported by an [`HttpTransport`](crate::clients::HttpTransport).
///
/// These never escape [`BestBuyClient::query`](crate::BestBuyClient::query);
/// they are recorded in the returned response's `error` metadata.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network, TLS or timeout failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A [`MockTransport`](crate::clients::MockTransport) had no case for the URI.
    #[error("Failed to find test case matching any registered URIs. URI expected: {uri}")]
    NoMatchingCase {
        /// The URI that was requested.
        uri: String,
    },
}
