//! Resource targets and their URI fragments.

use crate::resource::errors::TargetError;
use crate::resource::kind::{ResourceKind, ResponseFormat};
use std::fmt;

/// How a target picks its resources: one by identifier, or many by filter.
///
/// Filter strings are comparison expressions in the API's query grammar
/// (`name=bat*`, `salePrice<=99.99`, `area(11201,10)`) and are passed
/// through verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// A single resource (SKU or store ID), already trimmed.
    Identifier(String),
    /// A collection, narrowed by zero or more filters in the given order.
    Filters(Vec<String>),
}

impl Selector {
    /// Creates an identifier selector from any displayable value.
    ///
    /// ```rust
    /// use bestbuy_api::Selector;
    ///
    /// assert_eq!(Selector::identifier(" 1234 "), Selector::Identifier("1234".into()));
    /// assert_eq!(Selector::identifier(281), Selector::Identifier("281".into()));
    /// ```
    #[must_use]
    pub fn identifier(id: impl fmt::Display) -> Self {
        Self::Identifier(id.to_string().trim().to_string())
    }

    /// Creates a filter selector.
    #[must_use]
    pub fn filters<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Filters(filters.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<serde_json::Value> for Selector {
    type Error = TargetError;

    /// Classifies loosely typed input: strings and numbers are identifiers,
    /// arrays of strings are filters, anything else is rejected.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(Self::identifier(s)),
            Value::Number(n) => Ok(Self::identifier(n)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(TargetError::InvalidSelector {
                        reason: format!("filter {other} is not a string"),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Filters),
            Value::Null => Err(TargetError::InvalidSelector {
                reason: "got null".to_string(),
            }),
            Value::Bool(b) => Err(TargetError::InvalidSelector {
                reason: format!("got boolean {b}"),
            }),
            Value::Object(_) => Err(TargetError::InvalidSelector {
                reason: "got an object".to_string(),
            }),
        }
    }
}

/// One addressed resource, or a filtered collection of resources.
///
/// Targets are immutable once built. Their [`Display`](fmt::Display)
/// output is the URI fragment the API expects:
///
/// | Selector | Fragment |
/// |---|---|
/// | `Identifier("4")`, JSON | `stores/4.json` |
/// | `Filters(["manufacturer=canon", "salePrice<33"])` | `products(manufacturer=canon&salePrice<33)` |
/// | `Filters([])` or empty identifier | `products` |
///
/// # Example
///
/// ```rust
/// use bestbuy_api::{ResourceKind, ResourceTarget, ResponseFormat};
///
/// let target = ResourceTarget::identified(ResourceKind::Stores, 4)
///     .with_format(ResponseFormat::Json);
/// assert_eq!(target.to_string(), "stores/4.json");
///
/// let target = ResourceTarget::filtered(ResourceKind::Products, ["name=bat*"]);
/// assert_eq!(target.to_string(), "products(name=bat*)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceTarget {
    kind: ResourceKind,
    selector: Selector,
    format: ResponseFormat,
}

impl ResourceTarget {
    /// Creates a target from already validated parts.
    #[must_use]
    pub const fn new(kind: ResourceKind, selector: Selector, format: ResponseFormat) -> Self {
        Self {
            kind,
            selector,
            format,
        }
    }

    /// Targets a single resource by identifier, in the default format.
    #[must_use]
    pub fn identified(kind: ResourceKind, id: impl fmt::Display) -> Self {
        Self::new(kind, Selector::identifier(id), ResponseFormat::default())
    }

    /// Targets a collection narrowed by `filters`.
    #[must_use]
    pub fn filtered<I, S>(kind: ResourceKind, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(kind, Selector::filters(filters), ResponseFormat::default())
    }

    /// Creates a target from loosely typed kind and format names.
    ///
    /// Both names are trimmed and matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::InvalidKind`] or [`TargetError::InvalidFormat`]
    /// if either name is not recognized.
    pub fn parse(kind: &str, selector: Selector, format: &str) -> Result<Self, TargetError> {
        let kind = kind.parse()?;
        let format = format.parse()?;
        Ok(Self::new(kind, selector, format))
    }

    /// Creates a target entirely from loosely typed input.
    ///
    /// Validation runs in order: kind, then selector, then format. The
    /// first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::InvalidKind`], [`TargetError::InvalidSelector`]
    /// or [`TargetError::InvalidFormat`].
    pub fn try_from_parts(
        kind: &str,
        selector: serde_json::Value,
        format: &str,
    ) -> Result<Self, TargetError> {
        let kind: ResourceKind = kind.parse()?;
        let selector = Selector::try_from(selector)?;
        let format: ResponseFormat = format.parse()?;
        Ok(Self::new(kind, selector, format))
    }

    /// Returns a copy of this target using `format`.
    #[must_use]
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the selector.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Returns the response format.
    #[must_use]
    pub const fn format(&self) -> ResponseFormat {
        self.format
    }
}

impl fmt::Display for ResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Selector::Identifier(id) if !id.is_empty() => {
                write!(f, "{}/{}.{}", self.kind, id, self.format)
            }
            Selector::Filters(filters) if !filters.is_empty() => {
                write!(f, "{}({})", self.kind, filters.join("&"))
            }
            _ => f.write_str(self.kind.as_str()),
        }
    }
}
