//! Core domain layer for the Cinegraph gateway.
//!
//! This crate contains the domain models, port traits (interfaces), and
//! the catalog service that backs every GraphQL query. It follows
//! hexagonal architecture principles - this is the innermost layer with
//! no dependencies on HTTP clients or servers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    cinegraph (binary)                       │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │      cinegraph-graphql       │      cinegraph-upstream      │
//! │      (schema + server)       │      (OMDb / TMDb REST)      │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │                  cinegraph-core  ← YOU ARE HERE             │
//! │               (models, ports, services)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - OMDb/TMDb shapes (Movie, SearchResult, TrendingPage)
//! - [`ports`] - Interface traits for upstream adapters to implement
//! - [`services`] - Resolver logic (CatalogService)
//! - [`error`] - Upstream and gateway error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Ports
//!
//! - [`ports::MovieCatalog`] - Title search and single-record lookup (OMDb)
//! - [`ports::TrendingSource`] - Weekly trending rankings (TMDb)
//!
//! # Failure Policy
//!
//! Upstream failures never reach GraphQL callers. Each call is classified
//! as found, no match, or failed ([`models::Outcome`]); the class is logged
//! and counted, then collapsed into an empty result.

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
