//! Query accumulation and URI composition.
//!
//! This module provides the [`QueryBuilder`] that collects resource targets
//! and query parameters, and the immutable [`Query`] it produces.

use std::fmt;

use crate::clients::errors::QueryError;
use crate::config::ApiKey;
use crate::resource::{ResourceKind, ResourceTarget, ResponseFormat};

/// Name of the query parameter carrying the API key.
pub const API_KEY_PARAMETER: &str = "apiKey";

const REDACTED_KEY: &str = "*****";

/// A query parameter value.
///
/// Lists are flattened to a comma-joined string on conversion, so
/// `["sku", "name"]` is sent as `sku,name`.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::ParameterValue;
///
/// assert_eq!(ParameterValue::from(["sku", "name"]).as_str(), "sku,name");
/// assert_eq!(ParameterValue::from(25_u32).as_str(), "25");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterValue(String);

impl ParameterValue {
    /// Returns the value as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn join<T: AsRef<str>>(items: &[T]) -> Self {
        Self(
            items
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ParameterValue {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ParameterValue {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<bool> for ParameterValue {
    /// Booleans are sent as `1` and `0`.
    fn from(value: bool) -> Self {
        Self(u8::from(value).to_string())
    }
}

impl<T: AsRef<str>> From<Vec<T>> for ParameterValue {
    fn from(values: Vec<T>) -> Self {
        Self::join(&values)
    }
}

impl<T: AsRef<str>> From<&[T]> for ParameterValue {
    fn from(values: &[T]) -> Self {
        Self::join(values)
    }
}

impl<T: AsRef<str>, const N: usize> From<[T; N]> for ParameterValue {
    fn from(values: [T; N]) -> Self {
        Self::join(&values)
    }
}

/// Accumulates resource targets and query parameters for one request.
///
/// At most one target per [`ResourceKind`] is held; targeting a kind again
/// replaces the earlier target in place. Parameters behave the same way by
/// name. Both keep insertion order, which is the order they appear in the
/// URI.
///
/// Setters return `&mut Self` so calls can be chained on a long-lived
/// builder.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::{ApiKey, QueryBuilder};
///
/// let mut builder = QueryBuilder::new();
/// builder
///     .products(["name=bat*"])
///     .stores(["area(11201,10)"])
///     .show(["sku", "name"])
///     .page_size(5);
///
/// let query = builder.build().unwrap();
/// assert_eq!(
///     query.uri("https://api.bestbuy.com/v1", &ApiKey::new("k")),
///     "https://api.bestbuy.com/v1/products(name=bat*)+stores(area(11201,10))?show=sku,name&pageSize=5&apiKey=k"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    targets: Vec<ResourceTarget>,
    parameters: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets `target`, replacing any earlier target of the same kind.
    pub fn target(&mut self, target: ResourceTarget) -> &mut Self {
        match self.targets.iter_mut().find(|t| t.kind() == target.kind()) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
        self
    }

    /// Targets a resource described by loosely typed input.
    ///
    /// `kind` and `format` are matched case-insensitively; `selector` is a
    /// string or number for a single resource, or an array of filter
    /// strings for a collection.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidTarget`] if any part is rejected. The
    /// builder is unchanged in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bestbuy_api::QueryBuilder;
    /// use serde_json::json;
    ///
    /// let mut builder = QueryBuilder::new();
    /// builder.try_target("Stores", json!(["postalCode=55423"]), "xml").unwrap();
    /// assert_eq!(builder.targets()[0].to_string(), "stores(postalCode=55423)");
    ///
    /// assert!(builder.try_target("stores", json!({"id": 1}), "xml").is_err());
    /// assert_eq!(builder.targets().len(), 1);
    /// ```
    pub fn try_target(
        &mut self,
        kind: &str,
        selector: serde_json::Value,
        format: &str,
    ) -> Result<&mut Self, QueryError> {
        let target = ResourceTarget::try_from_parts(kind, selector, format)?;
        Ok(self.target(target))
    }

    /// Targets a single product by SKU, as XML.
    pub fn product(&mut self, sku: impl fmt::Display) -> &mut Self {
        self.product_as(sku, ResponseFormat::Xml)
    }

    /// Targets a single product by SKU in the given format.
    pub fn product_as(&mut self, sku: impl fmt::Display, format: ResponseFormat) -> &mut Self {
        self.target(ResourceTarget::identified(ResourceKind::Products, sku).with_format(format))
    }

    /// Targets the products collection, narrowed by `filters`.
    pub fn products<I, S>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target(ResourceTarget::filtered(ResourceKind::Products, filters))
    }

    /// Targets the products collection with an explicit format.
    ///
    /// The format is kept on the target but a filtered selector never
    /// renders it.
    pub fn products_as<I, S>(&mut self, filters: I, format: ResponseFormat) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target(ResourceTarget::filtered(ResourceKind::Products, filters).with_format(format))
    }

    /// Targets a single store by store ID, as XML.
    pub fn store(&mut self, store_id: impl fmt::Display) -> &mut Self {
        self.store_as(store_id, ResponseFormat::Xml)
    }

    /// Targets a single store by store ID in the given format.
    pub fn store_as(&mut self, store_id: impl fmt::Display, format: ResponseFormat) -> &mut Self {
        self.target(ResourceTarget::identified(ResourceKind::Stores, store_id).with_format(format))
    }

    /// Targets the stores collection, narrowed by `filters`.
    pub fn stores<I, S>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target(ResourceTarget::filtered(ResourceKind::Stores, filters))
    }

    /// Targets the stores collection with an explicit format; see
    /// [`products_as`](Self::products_as).
    pub fn stores_as<I, S>(&mut self, filters: I, format: ResponseFormat) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target(ResourceTarget::filtered(ResourceKind::Stores, filters).with_format(format))
    }

    /// Sets a single query parameter.
    ///
    /// Any name is accepted and forwarded verbatim, so options the API
    /// adds later need no client support.
    pub fn set_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> &mut Self {
        let name = name.into();
        let value = value.into().0;
        match self.parameters.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.parameters.push((name, value)),
        }
        self
    }

    /// Replaces all query parameters with `parameters`.
    pub fn set_parameters<I, K, V>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        self.parameters.clear();
        for (name, value) in parameters {
            self.set_parameter(name, value);
        }
        self
    }

    /// Requests a given result page (1-based).
    pub fn page(&mut self, page: u32) -> &mut Self {
        self.set_parameter("page", page)
    }

    /// Sets the number of results per page.
    pub fn page_size(&mut self, page_size: u32) -> &mut Self {
        self.set_parameter("pageSize", page_size)
    }

    /// Restricts the attributes returned for each result.
    pub fn show<I, S>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let attributes: Vec<S> = attributes.into_iter().collect();
        self.set_parameter("show", attributes)
    }

    /// Sets the sort order, e.g. `salePrice.desc`.
    pub fn sort(&mut self, sort: impl Into<String>) -> &mut Self {
        self.set_parameter("sort", sort.into())
    }

    /// Removes all targets and parameters.
    pub fn clear(&mut self) -> &mut Self {
        self.targets.clear();
        self.parameters.clear();
        self
    }

    /// Returns the current targets in URI order.
    #[must_use]
    pub fn targets(&self) -> &[ResourceTarget] {
        &self.targets
    }

    /// Returns the current parameters in URI order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Returns the value of parameter `name`, if set.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if neither targets nor parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.parameters.is_empty()
    }

    /// Snapshots the current state as an immutable [`Query`].
    ///
    /// The builder is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoTarget`] if nothing is targeted.
    pub fn build(&self) -> Result<Query, QueryError> {
        if self.targets.is_empty() {
            return Err(QueryError::NoTarget);
        }
        Ok(Query {
            targets: self.targets.clone(),
            parameters: self.parameters.clone(),
        })
    }
}

/// A complete, immutable request against the catalog API.
///
/// Produced by [`QueryBuilder::build`]; always holds at least one target.
/// The URI is a pure function of the query, the API base and the key:
///
/// ```text
/// {api_base}/{target1}+{target2}?{name1}={value1}&...&apiKey={key}
/// ```
///
/// Parameter values appear literally (not percent-escaped); whitespace is
/// only encoded when the request is dispatched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    targets: Vec<ResourceTarget>,
    parameters: Vec<(String, String)>,
}

impl Query {
    /// Returns the targets in URI order.
    #[must_use]
    pub fn targets(&self) -> &[ResourceTarget] {
        &self.targets
    }

    /// Returns the parameters in URI order, without the API key.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Returns the resource path: all targets joined with `+`.
    #[must_use]
    pub fn path(&self) -> String {
        self.targets
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Returns the query string, with `apiKey` last.
    ///
    /// A caller-supplied `apiKey` parameter is ignored in favor of `api_key`.
    #[must_use]
    pub fn query_string(&self, api_key: &ApiKey) -> String {
        self.query_string_with_key(api_key.as_ref())
    }

    /// Returns the full request URI.
    #[must_use]
    pub fn uri(&self, api_base: &str, api_key: &ApiKey) -> String {
        format!("{}/{}?{}", api_base, self.path(), self.query_string(api_key))
    }

    /// Returns the full request URI with the API key masked, for logging.
    #[must_use]
    pub fn redacted_uri(&self, api_base: &str) -> String {
        format!(
            "{}/{}?{}",
            api_base,
            self.path(),
            self.query_string_with_key(REDACTED_KEY)
        )
    }

    fn query_string_with_key(&self, key: &str) -> String {
        self.parameters
            .iter()
            .filter(|(name, _)| name != API_KEY_PARAMETER)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .chain(std::iter::once((API_KEY_PARAMETER, key)))
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Replaces every run of whitespace in `uri` with a single `%20`.
///
/// Applied to a URI immediately before dispatch, so that filter values
/// such as `name=ipad air*` reach the server intact.
#[must_use]
pub fn encode_whitespace(uri: &str) -> String {
    let mut encoded = String::with_capacity(uri.len());
    let mut in_whitespace = false;
    for c in uri.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                encoded.push_str("%20");
            }
            in_whitespace = true;
        } else {
            encoded.push(c);
            in_whitespace = false;
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://api.remix.bestbuy.com/v1";

    fn uri(builder: &QueryBuilder) -> String {
        builder.build().unwrap().uri(BASE, &ApiKey::new(""))
    }

    #[test]
    fn test_products_filter_uri() {
        let mut builder = QueryBuilder::new();
        builder.products(["a=b"]);
        assert_eq!(uri(&builder), "http://api.remix.bestbuy.com/v1/products(a=b)?apiKey=");
    }

    #[test]
    fn test_product_and_store_identifier_uris() {
        let mut builder = QueryBuilder::new();
        builder.product(123);
        assert_eq!(uri(&builder), "http://api.remix.bestbuy.com/v1/products/123.xml?apiKey=");

        let mut builder = QueryBuilder::new();
        builder.store_as(123, ResponseFormat::Json);
        assert_eq!(uri(&builder), "http://api.remix.bestbuy.com/v1/stores/123.json?apiKey=");
    }

    #[test]
    fn test_filtered_targets_keep_format_without_rendering_it() {
        let mut builder = QueryBuilder::new();
        builder
            .products_as(["onSale=true"], ResponseFormat::Json)
            .stores_as(["region=MN"], ResponseFormat::Json);

        assert!(builder
            .targets()
            .iter()
            .all(|target| target.format() == ResponseFormat::Json));
        assert_eq!(
            builder.build().unwrap().path(),
            "products(onSale=true)+stores(region=MN)"
        );
    }

    #[test]
    fn test_bool_parameters_are_sent_as_digits() {
        assert_eq!(ParameterValue::from(true).as_str(), "1");
        assert_eq!(ParameterValue::from(false).as_str(), "0");

        let mut builder = QueryBuilder::new();
        builder.products(["onSale=true"]).set_parameter("active", true);
        assert_eq!(builder.parameter("active"), Some("1"));
    }

    #[test]
    fn test_same_kind_replaces_earlier_target_in_place() {
        let mut builder = QueryBuilder::new();
        builder.products(["sku=1"]).stores(["id=2"]).product(3);

        assert_eq!(builder.targets().len(), 2);
        assert_eq!(builder.build().unwrap().path(), "products/3.xml+stores(id=2)");
    }

    #[test]
    fn test_set_parameter_flattens_lists() {
        let mut builder = QueryBuilder::new();
        builder.set_parameter("active", "false");
        assert_eq!(builder.parameters(), &[("active".to_string(), "false".to_string())]);

        builder.set_parameter("active", vec!["false", "true"]);
        assert_eq!(builder.parameter("active"), Some("false,true"));
        assert_eq!(builder.parameters().len(), 1);
    }

    #[test]
    fn test_set_parameters_replaces_rather_than_merges() {
        let mut builder = QueryBuilder::new();
        builder.set_parameters([("a", "b"), ("c", "d")]);
        assert_eq!(builder.parameter("a"), Some("b"));
        assert_eq!(builder.parameter("c"), Some("d"));

        builder.set_parameters([("e", vec!["test", "face"])]);
        assert_eq!(
            builder.parameters(),
            &[("e".to_string(), "test,face".to_string())]
        );
    }

    #[test]
    fn test_convenience_parameters() {
        let mut builder = QueryBuilder::new();
        builder
            .store(281)
            .page(2)
            .page_size(50)
            .show(["storeId", "name"])
            .sort("name.asc");

        let query = builder.build().unwrap();
        assert_eq!(
            query.query_string(&ApiKey::new("key")),
            "page=2&pageSize=50&show=storeId,name&sort=name.asc&apiKey=key"
        );
    }

    #[test]
    fn test_api_key_is_always_last_and_not_overridable() {
        let mut builder = QueryBuilder::new();
        builder
            .products(Vec::<String>::new())
            .set_parameter("apiKey", "spoofed")
            .set_parameter("format", "json");

        let query = builder.build().unwrap();
        assert_eq!(
            query.query_string(&ApiKey::new("real")),
            "format=json&apiKey=real"
        );
    }

    #[test]
    fn test_parameter_values_are_not_escaped() {
        let mut builder = QueryBuilder::new();
        builder
            .products(["name=ipad air*"])
            .set_parameter("show", "name,salePrice")
            .set_parameter("sort", "a&b");
        assert_eq!(
            uri(&builder),
            "http://api.remix.bestbuy.com/v1/products(name=ipad air*)?show=name,salePrice&sort=a&b&apiKey="
        );
    }

    #[test]
    fn test_build_without_target_fails() {
        let mut builder = QueryBuilder::new();
        builder.set_parameter("page", 1_u32);

        assert_eq!(builder.build(), Err(QueryError::NoTarget));
        assert_eq!(builder.parameter("page"), Some("1"));
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut builder = QueryBuilder::new();
        builder.product(1).page(1);
        assert_eq!(builder.build(), builder.build());
        assert!(!builder.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut builder = QueryBuilder::new();
        builder.set_parameters([("test", "abc")]).product(123456);
        builder.clear();
        assert!(builder.is_empty());
        builder.clear();
        assert!(builder.is_empty());
    }

    #[test]
    fn test_redacted_uri_masks_key() {
        let mut builder = QueryBuilder::new();
        builder.store(1);
        let redacted = builder.build().unwrap().redacted_uri(BASE);
        assert!(redacted.ends_with("stores/1.xml?apiKey=*****"));
    }

    #[test]
    fn test_encode_whitespace_collapses_runs() {
        assert_eq!(
            encode_whitespace("products(name=ipad  air\t2*)?apiKey="),
            "products(name=ipad%20air%202*)?apiKey="
        );
        assert_eq!(encode_whitespace("no-spaces"), "no-spaces");
    }
}
