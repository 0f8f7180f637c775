//! # Best Buy API Rust Client
//!
//! A Rust client for the Best Buy products and stores catalog API
//! (Remix and BBYOpen), providing type-safe configuration, query
//! composition, and rate-limited HTTP access.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`BestBuyConfig`] and [`BestBuyConfigBuilder`]
//! - Validated newtypes for the API key, base URI, timeout and rate limit
//! - Resource targets for products and stores, by identifier or by filter
//! - Deterministic request URIs, joined targets and arbitrary parameters
//! - A per-second rate limiter shared by all queries of a client
//! - Responses exposing the raw body, transfer metadata, and XML/JSON views
//!
//! ## Quick Start
//!
//! ```rust
//! use bestbuy_api::{ApiKey, ApiVersion, BestBuyConfig};
//!
//! let config = BestBuyConfig::builder()
//!     .api_key(ApiKey::new("your-api-key"))
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_base(), "https://api.bestbuy.com/v1");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,no_run
//! use bestbuy_api::{ApiKey, BestBuyClient, BestBuyConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BestBuyConfig::from_env()?;
//! let mut client = BestBuyClient::new(&config)?;
//!
//! // Store availability: products joined with stores near a ZIP code
//! let response = client
//!     .products(["sku=1234567"])
//!     .stores(["area(11201,10)"])
//!     .show(["storeId", "name"])
//!     .query()
//!     .await?;
//!
//! if let Some(doc) = response.to_xml() {
//!     for store in doc.children_named("store") {
//!         println!("{:?}", store.child("name").map(|n| n.text()));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Building Queries Separately
//!
//! ```rust
//! use bestbuy_api::{ApiKey, QueryBuilder};
//!
//! let query = QueryBuilder::new()
//!     .store(123)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     query.uri("https://api.bestbuy.com/v1", &ApiKey::new("k")),
//!     "https://api.bestbuy.com/v1/stores/123.xml?apiKey=k"
//! );
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Failures as data**: HTTP and transport failures come back in the [`Response`]
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod resource;

// Re-export public types at crate root for convenience
pub use config::{
    ApiBase, ApiKey, ApiVersion, BestBuyConfig, BestBuyConfigBuilder, RequestsPerSecond,
    TimeoutSeconds,
};
pub use error::ConfigError;
pub use resource::{
    ResourceKind, ResourceTarget, ResponseFormat, Selector, TargetError, FORMAT_JSON, FORMAT_XML,
};

// Re-export client types
pub use clients::{
    BestBuyClient, ParameterValue, Query, QueryBuilder, QueryError, Response, TransportError,
};
