//! Response type returned by catalog queries.
//!
//! A [`Response`] is the raw body plus whatever transfer metadata the
//! transport reported. Nothing is parsed up front: the body is handed back
//! verbatim and views such as [`Response::to_xml`] are computed on demand.

use std::fmt;

use serde_json::Value;

use crate::clients::transport::{metadata_keys, Metadata, RawResponse};
use crate::clients::xml::XmlElement;

/// Name under which [`Response::get`] returns the body.
pub const DATA_FIELD: &str = "data";

/// The body and transfer metadata of one API request.
///
/// HTTP error statuses and transport failures are reported here rather
/// than as errors; check [`Response::is_error`] before trusting the body.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::Response;
/// use serde_json::json;
///
/// let response = Response::new(
///     "<products/>",
///     [("http_code".to_string(), json!(200))].into_iter().collect(),
/// );
///
/// assert_eq!(response.data(), "<products/>");
/// assert_eq!(response.get("http_code"), Some(json!(200)));
/// assert!(!response.is_error());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    body: String,
    metadata: Metadata,
}

impl Response {
    /// Wraps a body and its metadata.
    #[must_use]
    pub fn new(body: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            body: body.into(),
            metadata,
        }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.body
    }

    /// Returns the transfer metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Looks up a field by name.
    ///
    /// `"data"` yields the body as a string; any other name is looked up in
    /// the metadata. An unknown name is not an error: it is logged at warn
    /// level and `None` is returned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == DATA_FIELD {
            return Some(Value::String(self.body.clone()));
        }
        let value = self.metadata.get(name).cloned();
        if value.is_none() {
            tracing::warn!("Undefined response field: {name}");
        }
        value
    }

    /// Returns `true` if `name` is `"data"` or a metadata field with a
    /// non-null value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        name == DATA_FIELD || self.metadata.get(name).is_some_and(|value| !value.is_null())
    }

    /// Returns the HTTP status code, if the transport reported one.
    ///
    /// `Some(0)` means no HTTP response was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        let code = self.metadata.get(metadata_keys::HTTP_CODE)?;
        code.as_u64()
            .or_else(|| code.as_str().and_then(|s| s.trim().parse().ok()))
            .and_then(|code| u16::try_from(code).ok())
    }

    /// Returns `true` for 4xx and 5xx statuses.
    ///
    /// A response without an `http_code` field is not classified as an
    /// error; a warning is logged instead.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status_code().map_or_else(
            || {
                tracing::warn!("Response has no {} field", metadata_keys::HTTP_CODE);
                false
            },
            |code| matches!(code / 100, 4 | 5),
        )
    }

    /// Parses the body as XML.
    ///
    /// Returns `None` if the body is not a well-formed XML document, which
    /// includes JSON bodies and the empty body of a failed transfer.
    #[must_use]
    pub fn to_xml(&self) -> Option<XmlElement> {
        match XmlElement::parse(&self.body) {
            Ok(element) => Some(element),
            Err(e) => {
                tracing::debug!("Response body is not XML: {e}");
                None
            }
        }
    }

    /// Parses the body as JSON, returning `None` if it is not JSON.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Returns the metadata plus a `"data"` entry holding the body.
    ///
    /// The body replaces any metadata field that is itself named `"data"`.
    #[must_use]
    pub fn to_map(&self) -> serde_json::Map<String, Value> {
        let mut map: serde_json::Map<String, Value> = self
            .metadata
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        map.insert(DATA_FIELD.to_string(), Value::String(self.body.clone()));
        map
    }

    /// Consumes the response, returning the body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

impl From<RawResponse> for Response {
    fn from(raw: RawResponse) -> Self {
        Self::new(raw.body, raw.metadata)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
