//! Canned-response transport for tests.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::query::encode_whitespace;
use crate::clients::transport::{HttpTransport, Metadata, RawResponse};

/// A request seen by a [`MockTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The requested URI.
    pub uri: String,
    /// The timeout the client asked for.
    pub timeout: Duration,
    /// Wall-clock time the request arrived.
    pub at: SystemTime,
}

#[derive(Clone, Debug)]
struct MockCase {
    uri: String,
    response: RawResponse,
}

/// [`HttpTransport`] that answers from registered test cases.
///
/// Use it to exercise code built on [`BestBuyClient`](crate::BestBuyClient)
/// without making requests to the API. Each case pairs an exact URI with
/// the body and metadata to respond with; a URI with no case fails with
/// [`TransportError::NoMatchingCase`]. Whitespace in registered URIs is
/// encoded the same way the client encodes it before dispatch.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::clients::MockTransport;
/// use serde_json::json;
///
/// let mut transport = MockTransport::new();
/// transport.register_case(
///     "https://api.bestbuy.com/v1/stores/281.json?apiKey=key",
///     r#"{"storeId":281}"#,
///     [("http_code", json!(200))],
/// );
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    cases: Vec<MockCase>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Creates a transport with no cases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a case answering `uri` with `body` and `metadata`.
    ///
    /// Earlier cases win when several match the same URI.
    pub fn register_case<I, K>(&mut self, uri: &str, body: impl Into<String>, metadata: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        let metadata: Metadata = metadata
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        self.cases.push(MockCase {
            uri: encode_whitespace(uri),
            response: RawResponse {
                body: body.into(),
                metadata,
            },
        });
        self
    }

    /// Returns every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                uri: url.to_string(),
                timeout,
                at: SystemTime::now(),
            });

        self.cases
            .iter()
            .find(|case| case.uri == url)
            .map(|case| case.response.clone())
            .ok_or_else(|| TransportError::NoMatchingCase {
                uri: url.to_string(),
            })
    }
}
