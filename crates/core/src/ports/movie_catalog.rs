//! Port trait for the canonical movie catalog.
//!
//! This trait defines the interface for searching titles and looking up
//! single records on OMDb. Implementations live in the infrastructure
//! layer (e.g., `cinegraph-upstream`).

use async_trait::async_trait;

use crate::error::UpstreamResult;
use crate::models::{SearchQuery, SearchResult, TitleLookup};

/// Port trait for the movie catalog (OMDb).
///
/// Implementations return the upstream envelope untouched. An envelope with
/// `Response: "False"` is a successful call; only transport, status and
/// decode failures are errors.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by title (`s=`), restricted to `type=movie`.
    async fn search(&self, query: &SearchQuery) -> UpstreamResult<SearchResult>;

    /// Look up a single record by exact title (`t=`) and optional year.
    async fn find_by_title(&self, title: &str, year: Option<&str>) -> UpstreamResult<TitleLookup>;
}
