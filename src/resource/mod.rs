//! Resource targets for catalog queries.
//!
//! A [`ResourceTarget`] names what a request is about: one product or store
//! by identifier, or a collection of them narrowed by filter expressions.
//! Targets render to the URI fragments the API expects, and several
//! targets can be joined with `+` in one request path (products joined with
//! stores yields store availability).
//!
//! # Example
//!
//! ```rust
//! use bestbuy_api::resource::{ResourceKind, ResourceTarget, Selector, ResponseFormat};
//!
//! let sku = ResourceTarget::identified(ResourceKind::Products, 1234567);
//! assert_eq!(sku.to_string(), "products/1234567.xml");
//!
//! let nearby = ResourceTarget::new(
//!     ResourceKind::Stores,
//!     Selector::filters(["area(11201,10)"]),
//!     ResponseFormat::Json,
//! );
//! assert_eq!(nearby.to_string(), "stores(area(11201,10))");
//! ```

mod errors;
mod kind;
mod target;

pub use errors::TargetError;
pub use kind::{ResourceKind, ResponseFormat, FORMAT_JSON, FORMAT_XML};
pub use target::{ResourceTarget, Selector};
