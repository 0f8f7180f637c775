//! HTTP client types for Best Buy API communication.
//!
//! This module provides the query and transport layer: building resource
//! queries, turning them into request URIs, throttling dispatch, and
//! wrapping what comes back.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`BestBuyClient`]: The long-lived client queries are configured on and sent from
//! - [`QueryBuilder`]: Accumulates targets and parameters for one request
//! - [`Query`]: An immutable request produced by a [`QueryBuilder`]
//! - [`Response`]: The body and transfer metadata of a request
//! - [`RateLimiter`]: The per-second request ceiling
//! - [`HttpTransport`]: The seam to the HTTP layer, with [`ReqwestTransport`]
//!   for real requests and [`MockTransport`] for tests
//! - [`XmlElement`]: A navigable view of an XML body
//!
//! # Example
//!
//! ```rust
//! use bestbuy_api::{BestBuyClient, BestBuyConfig};
//! use bestbuy_api::clients::MockTransport;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut transport = MockTransport::new();
//! transport.register_case(
//!     "https://api.bestbuy.com/v1/products/1234.json?apiKey=",
//!     r#"{"sku":1234}"#,
//!     [("http_code", json!(200))],
//! );
//!
//! let config = BestBuyConfig::builder().build().unwrap();
//! let mut client = BestBuyClient::with_transport(&config, transport);
//!
//! let response = client
//!     .product_as(1234, bestbuy_api::ResponseFormat::Json)
//!     .query()
//!     .await
//!     .unwrap();
//! assert_eq!(response.to_json().unwrap()["sku"], json!(1234));
//! assert!(client.pending().is_empty());
//! # });
//! ```
//!
//! # Failure Reporting
//!
//! Only caller mistakes are returned as errors. HTTP error statuses and
//! transport failures (DNS, connect, timeout) are reported inside the
//! [`Response`]: a failed transfer has an empty body, an `http_code` of `0`
//! and an `error` field. No request is retried.

mod client;
mod errors;
mod mock_transport;
mod query;
mod rate_limiter;
mod response;
mod transport;
mod xml;

pub use client::BestBuyClient;
pub use errors::{QueryError, TransportError};
pub use mock_transport::{MockTransport, RecordedRequest};
pub use query::{encode_whitespace, ParameterValue, Query, QueryBuilder, API_KEY_PARAMETER};
pub use rate_limiter::{Gate, RateLimiter};
pub use response::{Response, DATA_FIELD};
pub use transport::{
    metadata_keys, HttpTransport, Metadata, RawResponse, ReqwestTransport, SDK_VERSION,
};
pub use xml::{XmlElement, XmlParseError};
