//! HTTP transport for catalog requests.
//!
//! The client never talks to the network itself; it hands the finished URI
//! to an [`HttpTransport`] and wraps whatever comes back. This module
//! provides the trait, the production [`ReqwestTransport`], and the
//! metadata field names transports report.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::errors::TransportError;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transfer metadata: field name to value.
pub type Metadata = HashMap<String, Value>;

/// Metadata field names reported by [`ReqwestTransport`].
///
/// The names follow the conventions of curl's transfer info so that
/// existing tooling keyed on them keeps working.
pub mod metadata_keys {
    /// Last effective URL, after redirects.
    pub const URL: &str = "url";
    /// HTTP status code; `0` when no response was received.
    pub const HTTP_CODE: &str = "http_code";
    /// `Content-Type` of the response, or `null`.
    pub const CONTENT_TYPE: &str = "content_type";
    /// Approximate size of the received headers, in bytes.
    pub const HEADER_SIZE: &str = "header_size";
    /// `Content-Length` of the response, or `-1` if not sent.
    pub const DOWNLOAD_CONTENT_LENGTH: &str = "download_content_length";
    /// Number of body bytes received.
    pub const SIZE_DOWNLOAD: &str = "size_download";
    /// Total transfer time, in seconds.
    pub const TOTAL_TIME: &str = "total_time";
    /// `1` if the request was redirected, else `0`.
    pub const REDIRECT_COUNT: &str = "redirect_count";
    /// Transport failure message, present only when the request failed.
    pub const ERROR: &str = "error";
}

/// Body and metadata of one completed transfer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawResponse {
    /// Response body, empty if none was sent.
    pub body: String,
    /// Transfer metadata, including at least `http_code`.
    pub metadata: Metadata,
}

/// Performs GET requests on behalf of a [`BestBuyClient`](crate::BestBuyClient).
///
/// Implementations report HTTP error statuses as ordinary responses; only
/// failures that produce no response at all are returned as errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetches `url`, giving up after `timeout`.
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, TransportError>;
}

/// [`HttpTransport`] backed by `reqwest`.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::clients::ReqwestTransport;
///
/// let transport = ReqwestTransport::new(Some("MyApp/1.0")).unwrap();
/// assert!(transport.user_agent().starts_with("MyApp/1.0 | BestBuy API Library v"));
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    user_agent: String,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport, prefixing the `User-Agent` with `user_agent_prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the TLS backend cannot be initialized.
    pub fn new(user_agent_prefix: Option<&str>) -> Result<Self, TransportError> {
        let user_agent_prefix = user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}BestBuy API Library v{SDK_VERSION} | Rust {rust_version}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(user_agent.clone())
            .build()?;

        Ok(Self { client, user_agent })
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn header_size(headers: &reqwest::header::HeaderMap) -> usize {
        // "Name: value\r\n" per header, plus the blank line
        headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.as_bytes().len() + 4)
            .sum::<usize>()
            + 2
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, TransportError> {
        let started = Instant::now();
        let res = self.client.get(url).timeout(timeout).send().await?;

        let code = res.status().as_u16();
        let effective_url = res.url().to_string();
        let redirected = reqwest::Url::parse(url).is_ok_and(|requested| &requested != res.url());
        let redirect_count = u8::from(redirected);
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let header_size = Self::header_size(res.headers());
        let content_length = res.content_length();

        let body = res.text().await?;

        let mut metadata = Metadata::new();
        metadata.insert(metadata_keys::URL.to_string(), json!(effective_url));
        metadata.insert(metadata_keys::HTTP_CODE.to_string(), json!(code));
        metadata.insert(metadata_keys::CONTENT_TYPE.to_string(), json!(content_type));
        metadata.insert(metadata_keys::HEADER_SIZE.to_string(), json!(header_size));
        metadata.insert(
            metadata_keys::DOWNLOAD_CONTENT_LENGTH.to_string(),
            content_length.map_or_else(|| json!(-1), |len| json!(len)),
        );
        metadata.insert(metadata_keys::SIZE_DOWNLOAD.to_string(), json!(body.len()));
        metadata.insert(
            metadata_keys::TOTAL_TIME.to_string(),
            json!(started.elapsed().as_secs_f64()),
        );
        metadata.insert(
            metadata_keys::REDIRECT_COUNT.to_string(),
            json!(redirect_count),
        );

        Ok(RawResponse { body, metadata })
    }
}
