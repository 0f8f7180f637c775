//! Error types for resource target construction.

use thiserror::Error;

/// Errors raised while building a [`ResourceTarget`](crate::ResourceTarget).
///
/// These always indicate bad caller input and are never worth retrying.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::{ResourceTarget, Selector, TargetError};
///
/// let result = ResourceTarget::parse("categories", Selector::identifier("1"), "xml");
/// assert!(matches!(result, Err(TargetError::InvalidKind { .. })));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// The resource kind is not one of the supported kinds.
    #[error("Invalid type \"{kind}\" (stores, products)")]
    InvalidKind {
        /// The normalized kind that was rejected.
        kind: String,
    },

    /// The response format is not one of the supported formats.
    #[error("Invalid format \"{format}\" (xml, json)")]
    InvalidFormat {
        /// The normalized format that was rejected.
        format: String,
    },

    /// The selector is neither a scalar identifier nor a list of filters.
    #[error("Selector must be a string or number (identifier) or an array of strings (filters): {reason}")]
    InvalidSelector {
        /// What was wrong with the selector input.
        reason: String,
    },
}
