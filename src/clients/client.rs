//! Catalog API client.
//!
//! This module provides [`BestBuyClient`], the long-lived object callers
//! configure queries on. It owns the credentials, timeout and rate limiter,
//! which persist across queries, plus a pending [`QueryBuilder`] that is
//! cleared after every completed query.

use std::fmt;

use serde_json::json;

use crate::clients::errors::{QueryError, TransportError};
use crate::clients::query::{encode_whitespace, ParameterValue, Query, QueryBuilder};
use crate::clients::rate_limiter::RateLimiter;
use crate::clients::response::Response;
use crate::clients::transport::{metadata_keys, HttpTransport, Metadata, ReqwestTransport};
use crate::config::{ApiKey, BestBuyConfig, RequestsPerSecond, TimeoutSeconds};
use crate::error::ConfigError;
use crate::resource::{ResourceTarget, ResponseFormat};

/// Client for the products and stores catalog API.
///
/// Targets and parameters are accumulated with chainable setters and sent
/// with [`query`](Self::query), after which they are cleared. Timeout, rate
/// limit and API key are kept for the life of the client.
///
/// Alternatively, build a [`Query`] with a standalone [`QueryBuilder`] and
/// send it with [`execute`](Self::execute), which leaves the pending state
/// alone.
///
/// # Thread Safety
///
/// `query` and `execute` take `&mut self`, so one client issues one request
/// at a time. Give each concurrent task its own client, or wrap a shared
/// one in a mutex.
///
/// # Example
///
/// ```rust,no_run
/// use bestbuy_api::{ApiKey, BestBuyClient, BestBuyConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BestBuyConfig::builder()
///     .api_key(ApiKey::new("my-api-key"))
///     .build()?;
/// let mut client = BestBuyClient::new(&config)?;
///
/// let response = client
///     .products(["name=bat*", "salePrice<=99.99"])
///     .show(["sku", "name", "salePrice"])
///     .page_size(5)
///     .query()
///     .await?;
///
/// if !response.is_error() {
///     println!("{}", response.data());
/// }
/// # Ok(())
/// # }
/// ```
pub struct BestBuyClient<T: HttpTransport = ReqwestTransport> {
    api_key: ApiKey,
    api_base: String,
    timeout: TimeoutSeconds,
    rate_limiter: RateLimiter,
    transport: T,
    pending: QueryBuilder,
}

// Verify BestBuyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BestBuyClient>();
};

impl BestBuyClient<ReqwestTransport> {
    /// Creates a client that talks to the API over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: &BestBuyConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.user_agent_prefix())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> BestBuyClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(config: &BestBuyConfig, transport: T) -> Self {
        Self {
            api_key: config.api_key().clone(),
            api_base: config.api_base().to_string(),
            timeout: config.timeout(),
            rate_limiter: RateLimiter::new(config.requests_per_second()),
            transport,
            pending: QueryBuilder::new(),
        }
    }

    /// Returns the API key sent with every request.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the base URI requests are made against.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> TimeoutSeconds {
        self.timeout
    }

    /// Returns the rate limiter and its bookkeeping.
    #[must_use]
    pub const fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the pending targets and parameters.
    #[must_use]
    pub const fn pending(&self) -> &QueryBuilder {
        &self.pending
    }

    /// Sets the per-request timeout in seconds.
    ///
    /// Accepts integers, integral floats such as `5.0`, and numeric strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] unless the value is a positive
    /// whole number. The current timeout is kept in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bestbuy_api::{BestBuyClient, BestBuyConfig};
    /// use bestbuy_api::clients::MockTransport;
    ///
    /// let config = BestBuyConfig::builder().build().unwrap();
    /// let mut client = BestBuyClient::with_transport(&config, MockTransport::new());
    ///
    /// client.set_timeout(30).unwrap();
    /// assert_eq!(client.timeout().get(), 30);
    /// assert!(client.set_timeout(2.5).is_err());
    /// assert!(client.set_timeout(0).is_err());
    /// ```
    pub fn set_timeout<S>(&mut self, seconds: S) -> Result<&mut Self, ConfigError>
    where
        S: TryInto<TimeoutSeconds, Error = ConfigError>,
    {
        self.timeout = seconds.try_into()?;
        Ok(self)
    }

    /// Sets how many requests may start within one second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRequestsPerSecond`] for zero.
    pub fn set_requests_per_second(&mut self, limit: u32) -> Result<&mut Self, ConfigError> {
        self.rate_limiter.set_limit(RequestsPerSecond::new(limit)?);
        Ok(self)
    }

    /// Targets `target`, replacing any earlier target of the same kind.
    pub fn target(&mut self, target: ResourceTarget) -> &mut Self {
        self.pending.target(target);
        self
    }

    /// Targets a resource described by loosely typed input; see
    /// [`QueryBuilder::try_target`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidTarget`] if any part is rejected.
    pub fn try_target(
        &mut self,
        kind: &str,
        selector: serde_json::Value,
        format: &str,
    ) -> Result<&mut Self, QueryError> {
        self.pending.try_target(kind, selector, format)?;
        Ok(self)
    }

    /// Targets a single product by SKU, as XML.
    pub fn product(&mut self, sku: impl fmt::Display) -> &mut Self {
        self.pending.product(sku);
        self
    }

    /// Targets a single product by SKU in the given format.
    pub fn product_as(&mut self, sku: impl fmt::Display, format: ResponseFormat) -> &mut Self {
        self.pending.product_as(sku, format);
        self
    }

    /// Targets the products collection, narrowed by `filters`.
    pub fn products<I, S>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.products(filters);
        self
    }

    /// Targets the products collection with an explicit format; see
    /// [`QueryBuilder::products_as`].
    pub fn products_as<I, S>(&mut self, filters: I, format: ResponseFormat) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.products_as(filters, format);
        self
    }

    /// Targets a single store by ID, as XML.
    pub fn store(&mut self, store_id: impl fmt::Display) -> &mut Self {
        self.pending.store(store_id);
        self
    }

    /// Targets a single store by ID in the given format.
    pub fn store_as(&mut self, store_id: impl fmt::Display, format: ResponseFormat) -> &mut Self {
        self.pending.store_as(store_id, format);
        self
    }

    /// Targets the stores collection, narrowed by `filters`.
    pub fn stores<I, S>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.stores(filters);
        self
    }

    /// Targets the stores collection with an explicit format.
    pub fn stores_as<I, S>(&mut self, filters: I, format: ResponseFormat) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.stores_as(filters, format);
        self
    }

    /// Sets a single query parameter; see [`QueryBuilder::set_parameter`].
    pub fn set_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> &mut Self {
        self.pending.set_parameter(name, value);
        self
    }

    /// Replaces all pending query parameters.
    pub fn set_parameters<I, K, V>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        self.pending.set_parameters(parameters);
        self
    }

    /// Requests a given result page (1-based).
    pub fn page(&mut self, page: u32) -> &mut Self {
        self.pending.page(page);
        self
    }

    /// Sets the number of results per page.
    pub fn page_size(&mut self, page_size: u32) -> &mut Self {
        self.pending.page_size(page_size);
        self
    }

    /// Restricts the attributes returned for each result.
    pub fn show<I, S>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pending.show(attributes);
        self
    }

    /// Sets the sort order, e.g. `salePrice.desc`.
    pub fn sort(&mut self, sort: impl Into<String>) -> &mut Self {
        self.pending.sort(sort);
        self
    }

    /// Discards pending targets and parameters. Settings are kept.
    pub fn clear(&mut self) -> &mut Self {
        self.pending.clear();
        self
    }

    /// Returns the URI [`query`](Self::query) would request, before
    /// whitespace encoding. Nothing is modified.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoTarget`] if nothing is targeted.
    pub fn build_uri(&self) -> Result<String, QueryError> {
        Ok(self.pending.build()?.uri(&self.api_base, &self.api_key))
    }

    /// Sends the pending query and clears it.
    ///
    /// Waits first if the rate limit for the current second is used up.
    /// HTTP error statuses and transport failures come back as a
    /// [`Response`]; check [`Response::is_error`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoTarget`] if nothing is targeted. No request
    /// is made and the pending state is left as it was.
    pub async fn query(&mut self) -> Result<Response, QueryError> {
        let query = self.pending.build()?;
        let response = self.execute(&query).await;
        self.pending.clear();
        Ok(response)
    }

    /// Sends `query`, honoring the rate limit.
    ///
    /// The pending targets and parameters are not used or modified.
    pub async fn execute(&mut self, query: &Query) -> Response {
        let waited = self.rate_limiter.acquire().await;
        if !waited.is_zero() {
            tracing::debug!("Rate limited for {:?}", waited);
        }

        let uri = encode_whitespace(&query.uri(&self.api_base, &self.api_key));
        tracing::debug!(
            "GET {} (timeout {}s)",
            encode_whitespace(&query.redacted_uri(&self.api_base)),
            self.timeout.get()
        );

        match self.transport.get(&uri, self.timeout.as_duration()).await {
            Ok(raw) => Response::from(raw),
            Err(e) => {
                tracing::warn!("Request to {} failed: {e}", query.redacted_uri(&self.api_base));
                Self::failed_response(&uri, &e)
            }
        }
    }

    fn failed_response(uri: &str, error: &TransportError) -> Response {
        let mut metadata = Metadata::new();
        metadata.insert(metadata_keys::URL.to_string(), json!(uri));
        metadata.insert(metadata_keys::HTTP_CODE.to_string(), json!(0));
        metadata.insert(metadata_keys::ERROR.to_string(), json!(error.to_string()));
        Response::new(String::new(), metadata)
    }
}

impl<T: HttpTransport + fmt::Debug> fmt::Debug for BestBuyClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestBuyClient")
            .field("api_key", &self.api_key)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("rate_limiter", &self.rate_limiter)
            .field("transport", &self.transport)
            .field("pending", &self.pending)
            .finish()
    }
}
