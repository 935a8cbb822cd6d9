//! GraphQL API for the Cinegraph gateway.
//!
//! Exposes OMDb search and TMDb trending data through one GraphQL endpoint.
//!
//! # Serving the Schema
//!
//! ```ignore
//! use std::sync::Arc;
//! use cinegraph_graphql::{build_schema, serve_with_shutdown, ServerConfig};
//!
//! let schema = build_schema(Arc::new(catalog_service));
//! let shutdown = async {
//!     let _ = tokio::signal::ctrl_c().await;
//! };
//! serve_with_shutdown(schema, ServerConfig::default(), shutdown).await?;
//! ```
//!
//! # Endpoints
//!
//! - `GET|POST /graphql` - GraphQL queries (query string or JSON body)
//! - `GET /` - GraphiQL playground (when enabled)
//! - `GET /health` - Liveness probe

mod schema;
mod server;
mod types;

pub use schema::{
    build_schema, Movie, MovieQuery, SearchResult, MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH,
};
pub use server::{router, serve_with_shutdown, ServerConfig};
pub use types::CinegraphSchema;
