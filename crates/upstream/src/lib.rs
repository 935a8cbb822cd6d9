//! REST adapters for the Cinegraph gateway.
//!
//! This crate implements the [`MovieCatalog`] and [`TrendingSource`] ports
//! from `cinegraph-core` against OMDb and TMDb over HTTP.
//!
//! # Features
//!
//! - One `reqwest` connection pool, shared by both clients via [`shared_client`]
//! - Non-2xx statuses and non-JSON bodies reported as distinct errors
//! - API keys masked in every logged URL and transport error
//!
//! # Usage
//!
//! ```ignore
//! use cinegraph_upstream::{OmdbClient, OmdbClientConfig};
//!
//! let omdb = OmdbClient::new(OmdbClientConfig {
//!     api_key: std::env::var("OMDB_API_KEY").unwrap_or_default(),
//!     ..Default::default()
//! })?;
//!
//! let result = omdb.search(&SearchQuery::new("inception")).await?;
//! ```
//!
//! [`MovieCatalog`]: cinegraph_core::ports::MovieCatalog
//! [`TrendingSource`]: cinegraph_core::ports::TrendingSource

mod http;
mod omdb;
mod tmdb;

pub use http::shared_client;
pub use omdb::{OmdbClient, OmdbClientConfig};
pub use tmdb::{TmdbClient, TmdbClientConfig};
