//! GraphQL schema definition.
//!
//! This module exposes the movie catalog as a single `Query` root with
//! `searchMovies`, `trendingMovies` and `suggestions`. Field names follow
//! OMDb's JSON (`imdbID`, `Title`, `totalResults`, ...) so existing clients
//! can read results without remapping.

use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, ID, Object, Result, Schema};

use cinegraph_core::models::SearchQuery;
use cinegraph_core::services::CatalogService;

use crate::types::CinegraphSchema;

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
pub const MAX_QUERY_COMPLEXITY: usize = 500;

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the gateway schema around a catalog service.
///
/// Introspection stays enabled. Includes query depth and complexity limits.
pub fn build_schema(catalog: Arc<CatalogService>) -> CinegraphSchema {
    Schema::build(MovieQuery, EmptyMutation, EmptySubscription)
        .data(catalog)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

// -----------------------------------------------------------------------------
// Movie Query
// -----------------------------------------------------------------------------

/// Query root. Upstream failures resolve to empty results, not errors.
#[derive(Default)]
pub struct MovieQuery;

#[Object(name = "Query")]
impl MovieQuery {
    /// Search movies by title, optionally filtered by release year.
    async fn search_movies<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        title: String,
        year: Option<String>,
        page: Option<i32>,
    ) -> Result<SearchResult> {
        let catalog = ctx.data::<Arc<CatalogService>>()?;

        let query = SearchQuery::new(title).with_year(year).with_page(page);
        let result = catalog.search_movies(query).await;

        Ok(SearchResult::from(result))
    }

    /// This week's trending movies (defaults to the first page).
    async fn trending_movies<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        page: Option<i32>,
    ) -> Result<SearchResult> {
        let catalog = ctx.data::<Arc<CatalogService>>()?;

        let result = catalog.trending_movies(page).await;
        Ok(SearchResult::from(result))
    }

    /// Up to five movie titles matching `value`, for autocompletion.
    async fn suggestions<'ctx>(&self, ctx: &Context<'ctx>, value: String) -> Result<Vec<String>> {
        let catalog = ctx.data::<Arc<CatalogService>>()?;

        Ok(catalog.suggestions(&value).await)
    }
}

// -----------------------------------------------------------------------------
// GraphQL Types
// -----------------------------------------------------------------------------

/// Movie type (OMDb record).
#[derive(async_graphql::SimpleObject)]
pub struct Movie {
    #[graphql(name = "imdbID")]
    pub imdb_id: ID,
    #[graphql(name = "Title")]
    pub title: String,
    #[graphql(name = "Year")]
    pub year: String,
    #[graphql(name = "Type")]
    pub kind: String,
    /// Poster URL, or `"N/A"` when OMDb has none.
    #[graphql(name = "Poster")]
    pub poster: Option<String>,
}

impl From<cinegraph_core::models::Movie> for Movie {
    fn from(m: cinegraph_core::models::Movie) -> Self {
        Self {
            imdb_id: ID(m.imdb_id),
            title: m.title,
            year: m.year,
            kind: m.kind,
            poster: m.poster,
        }
    }
}

/// Search envelope shared by `searchMovies` and `trendingMovies`.
#[derive(async_graphql::SimpleObject)]
pub struct SearchResult {
    #[graphql(name = "Search")]
    pub search: Option<Vec<Movie>>,
    /// Total matches across all pages, string-encoded.
    #[graphql(name = "totalResults")]
    pub total_results: Option<String>,
    /// `"True"` or `"False"`.
    #[graphql(name = "Response")]
    pub response: String,
    /// Upstream reason when `Response` is `"False"`.
    #[graphql(name = "Error")]
    pub error: Option<String>,
}

impl From<cinegraph_core::models::SearchResult> for SearchResult {
    fn from(r: cinegraph_core::models::SearchResult) -> Self {
        Self {
            search: r
                .search
                .map(|movies| movies.into_iter().map(Movie::from).collect()),
            total_results: r.total_results,
            response: r.response,
            error: r.error,
        }
    }
}
