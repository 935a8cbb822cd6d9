//! Catalog service - aggregates OMDb and TMDb behind the three queries.
//!
//! Every upstream failure is absorbed here. Callers always receive a
//! well-formed [`SearchResult`] or suggestion list, never an error.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tracing::{debug, instrument, warn};

use crate::error::Upstream;
use crate::metrics::{UpstreamTimer, record_trending_dropped, record_upstream_request};
use crate::models::{Movie, Outcome, SearchQuery, SearchResult, TrendingTitle};
use crate::ports::{MovieCatalog, TrendingSource};

/// Maximum number of titles returned by [`CatalogService::suggestions`].
pub const SUGGESTION_LIMIT: usize = 5;

/// Trending page requested when the caller gives none.
pub const DEFAULT_TRENDING_PAGE: u32 = 1;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Maximum number of OMDb lookups in flight during the trending fan-out.
    pub max_concurrent_lookups: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: 8,
        }
    }
}

// =============================================================================
// CatalogService
// =============================================================================

/// Resolver logic for `searchMovies`, `trendingMovies` and `suggestions`.
///
/// # Flow (trending)
///
/// 1. Fetch one page of weekly trending titles
/// 2. Look up each title on OMDb by exact title and release year
/// 3. Keep the lookups that matched, in TMDb's ranking order
pub struct CatalogService {
    config: CatalogConfig,
    catalog: Arc<dyn MovieCatalog>,
    trending: Arc<dyn TrendingSource>,
}

impl CatalogService {
    pub fn new(
        config: CatalogConfig,
        catalog: Arc<dyn MovieCatalog>,
        trending: Arc<dyn TrendingSource>,
    ) -> Self {
        Self {
            config,
            catalog,
            trending,
        }
    }

    /// Search movies by title, optionally filtered by year and paged.
    ///
    /// Records missing a non-null schema field are dropped. A no-match
    /// answer is passed through; failures return [`SearchResult::empty`].
    #[instrument(skip_all, fields(title = %query.title, page = ?query.page))]
    pub async fn search_movies(&self, query: SearchQuery) -> SearchResult {
        match self.search_outcome(&query).await {
            Outcome::Found(mut result) => {
                if let Some(movies) = result.search.as_mut() {
                    movies.retain(Movie::is_complete);
                }
                result
            }
            Outcome::NoMatch { reason } => SearchResult::no_match(reason),
            Outcome::Failed(_) => SearchResult::empty(),
        }
    }

    /// This week's trending movies, as canonical OMDb records.
    ///
    /// Non-positive pages are treated as the first page.
    #[instrument(skip(self))]
    pub async fn trending_movies(&self, page: Option<i32>) -> SearchResult {
        let page = page
            .and_then(|p| u32::try_from(p).ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_TRENDING_PAGE);

        let trending = {
            let _timer = UpstreamTimer::new(Upstream::Tmdb);
            self.trending.trending_week(page).await
        };

        let trending = match trending {
            Ok(trending) => {
                record_upstream_request(Upstream::Tmdb, "found");
                trending
            }
            Err(e) => {
                record_upstream_request(Upstream::Tmdb, "failed");
                warn!(error = %e, "⚠️  Trending fetch failed");
                return SearchResult::empty();
            }
        };

        debug!(titles = trending.results.len(), "Trending page fetched");

        // `buffered` yields in input order regardless of completion order.
        let lookups: Vec<Outcome<Movie>> = stream::iter(trending.results)
            .map(|entry| async move { self.lookup_trending(&entry).await })
            .buffered(self.config.max_concurrent_lookups.max(1))
            .collect()
            .await;

        let requested = lookups.len();
        let movies: Vec<Movie> = lookups.into_iter().filter_map(Outcome::found).collect();

        let dropped = requested - movies.len();
        if dropped > 0 {
            record_trending_dropped(dropped as u64);
            debug!(dropped, kept = movies.len(), "Trending titles without OMDb match");
        }

        SearchResult::found(movies, trending.total_results)
    }

    /// Up to [`SUGGESTION_LIMIT`] titles matching `value`.
    #[instrument(skip(self))]
    pub async fn suggestions(&self, value: &str) -> Vec<String> {
        if value.trim().is_empty() {
            return Vec::new();
        }

        match self.search_outcome(&SearchQuery::new(value)).await {
            Outcome::Found(result) => result
                .movies()
                .iter()
                .filter(|movie| !movie.title.is_empty())
                .take(SUGGESTION_LIMIT)
                .map(|movie| movie.title.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Run an OMDb search and classify the answer.
    async fn search_outcome(&self, query: &SearchQuery) -> Outcome<SearchResult> {
        let result = {
            let _timer = UpstreamTimer::new(Upstream::Omdb);
            self.catalog.search(query).await
        };

        let outcome = match result {
            Ok(result) if result.is_success() => Outcome::Found(result),
            Ok(result) => Outcome::NoMatch {
                reason: result.error,
            },
            Err(e) => Outcome::Failed(e),
        };

        observe(Upstream::Omdb, &outcome);
        outcome
    }

    /// Resolve one trending entry to its OMDb record.
    async fn lookup_trending(&self, entry: &TrendingTitle) -> Outcome<Movie> {
        let Some(title) = entry.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            debug!(id = ?entry.id, "Trending entry without title, skipping");
            return Outcome::NoMatch {
                reason: Some("missing title".to_string()),
            };
        };
        let year = entry.release_year();

        let lookup = {
            let _timer = UpstreamTimer::new(Upstream::Omdb);
            self.catalog.find_by_title(title, year).await
        };

        let outcome = match lookup {
            Ok(lookup) if lookup.is_success() => {
                let year_matches = year.is_none_or(|y| lookup.movie.year.starts_with(y));
                if lookup.movie.is_complete() && year_matches {
                    Outcome::Found(lookup.movie)
                } else {
                    Outcome::NoMatch {
                        reason: Some(format!(
                            "record {} ({}) does not match release year {:?}",
                            lookup.movie.imdb_id, lookup.movie.year, year
                        )),
                    }
                }
            }
            Ok(lookup) => Outcome::NoMatch {
                reason: lookup.error,
            },
            Err(e) => Outcome::Failed(e),
        };

        observe(Upstream::Omdb, &outcome);
        outcome
    }
}

/// Log and count an upstream outcome.
fn observe<T>(upstream: Upstream, outcome: &Outcome<T>) {
    record_upstream_request(upstream, outcome.label());

    match outcome {
        Outcome::Found(_) => debug!(upstream = %upstream, "Upstream answered"),
        Outcome::NoMatch { reason } => {
            debug!(upstream = %upstream, reason = ?reason, "Upstream reported no match")
        }
        Outcome::Failed(e) => {
            warn!(upstream = %upstream, kind = e.kind(), error = %e, "⚠️  Upstream call failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::{UpstreamError, UpstreamResult};
    use crate::models::{TitleLookup, TrendingPage};

    fn movie(id: &str, title: &str, year: &str) -> Movie {
        Movie {
            imdb_id: id.into(),
            title: title.into(),
            year: year.into(),
            kind: "movie".into(),
            poster: Some("N/A".into()),
        }
    }

    fn unreachable(upstream: Upstream) -> UpstreamError {
        UpstreamError::Transport {
            upstream,
            message: "connection refused".into(),
        }
    }

    /// OMDb double: canned search answers and per-title records.
    #[derive(Default)]
    struct MockCatalog {
        search: Option<SearchResult>,
        records: HashMap<String, (Movie, Duration)>,
        failing_titles: Vec<String>,
        queries: Mutex<Vec<SearchQuery>>,
        lookups: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MockCatalog {
        fn with_record(mut self, movie: Movie, delay_ms: u64) -> Self {
            self.records.insert(
                movie.title.clone(),
                (movie, Duration::from_millis(delay_ms)),
            );
            self
        }
    }

    #[async_trait]
    impl MovieCatalog for MockCatalog {
        async fn search(&self, query: &SearchQuery) -> UpstreamResult<SearchResult> {
            self.queries.lock().unwrap().push(query.clone());
            self.search.clone().ok_or_else(|| unreachable(Upstream::Omdb))
        }

        async fn find_by_title(&self, title: &str, year: Option<&str>) -> UpstreamResult<TitleLookup> {
            self.lookups
                .lock()
                .unwrap()
                .push((title.to_string(), year.map(String::from)));

            if self.failing_titles.iter().any(|t| t == title) {
                return Err(UpstreamError::Status {
                    upstream: Upstream::Omdb,
                    status: 503,
                });
            }

            match self.records.get(title) {
                Some((movie, delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(TitleLookup {
                        movie: movie.clone(),
                        response: "True".into(),
                        error: None,
                    })
                }
                None => Ok(TitleLookup {
                    movie: Movie::default(),
                    response: "False".into(),
                    error: Some("Movie not found!".into()),
                }),
            }
        }
    }

    /// TMDb double returning a fixed page, or failing when `page` is `None`.
    struct MockTrending {
        page: Option<TrendingPage>,
        requested: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl TrendingSource for MockTrending {
        async fn trending_week(&self, page: u32) -> UpstreamResult<TrendingPage> {
            self.requested.lock().unwrap().push(page);
            self.page.clone().ok_or_else(|| unreachable(Upstream::Tmdb))
        }
    }

    fn trending_page(entries: &[(&str, &str)], total_results: u64) -> TrendingPage {
        TrendingPage {
            page: 1,
            results: entries
                .iter()
                .enumerate()
                .map(|(i, (title, date))| TrendingTitle {
                    id: Some(i as u64),
                    title: Some(title.to_string()),
                    release_date: Some(date.to_string()),
                })
                .collect(),
            total_pages: 500,
            total_results,
        }
    }

    fn build_service(catalog: MockCatalog, trending: Option<TrendingPage>) -> (CatalogService, Arc<MockCatalog>, Arc<MockTrending>) {
        let catalog = Arc::new(catalog);
        let trending = Arc::new(MockTrending {
            page: trending,
            requested: Mutex::new(Vec::new()),
        });
        let service = CatalogService::new(CatalogConfig::default(), catalog.clone(), trending.clone());
        (service, catalog, trending)
    }

    fn inception_search() -> SearchResult {
        SearchResult::found(
            vec![
                movie("tt1375666", "Inception", "2010"),
                movie("tt5295894", "Inception: The Cobol Job", "2010"),
                movie("", "Broken record", "2010"),
            ],
            "38",
        )
    }

    // Test critique: scénario de référence "inception"
    #[tokio::test]
    async fn test_search_movies_returns_upstream_envelope() {
        let (service, catalog, _) = build_service(
            MockCatalog {
                search: Some(inception_search()),
                ..Default::default()
            },
            None,
        );

        let query = SearchQuery::new("inception").with_page(Some(1));
        let result = service.search_movies(query.clone()).await;

        assert!(result.is_success());
        assert_eq!(result.total_results.as_deref(), Some("38"));
        let first = &result.movies()[0];
        assert_eq!(first.imdb_id, "tt1375666");
        assert_eq!(first.title, "Inception");
        assert_eq!(first.year, "2010");
        // Les enregistrements incomplets sont filtrés
        assert!(result.movies().iter().all(Movie::is_complete));
        assert_eq!(result.movies().len(), 2);

        assert_eq!(catalog.queries.lock().unwrap()[0], query);
    }

    #[tokio::test]
    async fn test_search_movies_is_idempotent() {
        let (service, _, _) = build_service(
            MockCatalog {
                search: Some(inception_search()),
                ..Default::default()
            },
            None,
        );

        let query = SearchQuery::new("inception").with_page(Some(1));
        let first = service.search_movies(query.clone()).await;
        let second = service.search_movies(query).await;
        assert_eq!(first.search, second.search);
    }

    // Test critique: un upstream injoignable produit l'enveloppe vide, jamais une erreur
    #[tokio::test]
    async fn test_search_and_suggestions_fail_soft() {
        let (service, _, _) = build_service(MockCatalog::default(), None);

        let result = service.search_movies(SearchQuery::new("inception")).await;
        assert_eq!(result, SearchResult::empty());

        assert!(service.suggestions("Star").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_no_match_passes_reason_through() {
        let (service, _, _) = build_service(
            MockCatalog {
                search: Some(SearchResult::no_match(Some("Movie not found!".into()))),
                ..Default::default()
            },
            None,
        );

        let result = service.search_movies(SearchQuery::new("zzzzzz")).await;
        assert!(!result.is_success());
        assert!(result.search.is_none());
        assert_eq!(result.error.as_deref(), Some("Movie not found!"));
    }

    // Test critique: au plus 5 suggestions, toutes issues de la recherche
    #[tokio::test]
    async fn test_suggestions_limit_and_origin() {
        let titles = [
            "Star Wars",
            "Star Wars: Episode V",
            "Star Trek",
            "A Star Is Born",
            "Star Wars: Episode VI",
            "Star Trek Into Darkness",
            "Stardust",
        ];
        let search = SearchResult::found(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| movie(&format!("tt{i}"), t, "1977"))
                .collect(),
            "3000",
        );
        let (service, catalog, _) = build_service(
            MockCatalog {
                search: Some(search),
                ..Default::default()
            },
            None,
        );

        let suggestions = service.suggestions("Star").await;
        assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
        assert_eq!(suggestions, titles[..5]);
        assert_eq!(catalog.queries.lock().unwrap()[0], SearchQuery::new("Star"));
    }

    #[tokio::test]
    async fn test_suggestions_short_lists_and_absent_search() {
        let (service, _, _) = build_service(
            MockCatalog {
                search: Some(SearchResult::found(vec![movie("tt1", "Heat", "1995")], "1")),
                ..Default::default()
            },
            None,
        );
        assert_eq!(service.suggestions("Heat").await, vec!["Heat".to_string()]);

        let (service, _, _) = build_service(
            MockCatalog {
                search: Some(SearchResult::no_match(Some("Too many results.".into()))),
                ..Default::default()
            },
            None,
        );
        assert!(service.suggestions("a").await.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_blank_value_skips_upstream() {
        let (service, catalog, _) = build_service(MockCatalog::default(), None);

        assert!(service.suggestions("   ").await.is_empty());
        assert!(catalog.queries.lock().unwrap().is_empty());
    }

    // Test critique: l'ordre TMDb est préservé même si les lookups finissent dans le désordre
    #[tokio::test]
    async fn test_trending_preserves_ranking_order() {
        let catalog = MockCatalog::default()
            .with_record(movie("tt1", "Dune: Part Two", "2024"), 60)
            .with_record(movie("tt2", "Oppenheimer", "2023"), 30)
            .with_record(movie("tt3", "Barbie", "2023"), 0);
        let page = trending_page(
            &[("Dune: Part Two", "2024-02-27"), ("Oppenheimer", "2023-07-19"), ("Barbie", "2023-07-19")],
            1000,
        );
        let (service, catalog, trending) = build_service(catalog, Some(page));

        let result = service.trending_movies(Some(1)).await;

        assert!(result.is_success());
        assert_eq!(result.total_results.as_deref(), Some("1000"));
        let ids: Vec<&str> = result.movies().iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, ["tt1", "tt2", "tt3"]);

        assert_eq!(*trending.requested.lock().unwrap(), vec![1]);
        let lookups = catalog.lookups.lock().unwrap();
        assert!(lookups.contains(&("Oppenheimer".to_string(), Some("2023".to_string()))));
    }

    // Test critique: les échecs partiels sont ignorés, l'appel global réussit
    #[tokio::test]
    async fn test_trending_drops_failed_and_unmatched_lookups() {
        let catalog = MockCatalog {
            failing_titles: vec!["Wicked".into()],
            ..Default::default()
        }
        .with_record(movie("tt1", "Gladiator II", "2024"), 0)
        // Année incohérente avec TMDb
        .with_record(movie("tt2", "Nosferatu", "1922"), 0);

        let mut page = trending_page(
            &[
                ("Wicked", "2024-11-20"),
                ("Gladiator II", "2024-11-13"),
                ("Nosferatu", "2024-12-25"),
                ("Unknown Indie", "2024-01-01"),
            ],
            20,
        );
        page.results.push(TrendingTitle {
            id: Some(99),
            title: None,
            release_date: Some("2024-01-01".into()),
        });
        let (service, catalog, _) = build_service(catalog, Some(page));

        let result = service.trending_movies(None).await;

        assert!(result.is_success());
        assert_eq!(result.movies().len(), 1);
        assert_eq!(result.movies()[0].title, "Gladiator II");
        // L'entrée sans titre ne déclenche pas de lookup
        assert_eq!(catalog.lookups.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_trending_without_release_date_looks_up_by_title() {
        let catalog = MockCatalog::default().with_record(movie("tt9", "Untitled Project", "2026"), 0);
        let mut page = trending_page(&[], 1);
        page.results.push(TrendingTitle {
            id: Some(9),
            title: Some("Untitled Project".into()),
            release_date: None,
        });
        let (service, catalog, _) = build_service(catalog, Some(page));

        let result = service.trending_movies(Some(1)).await;

        assert_eq!(result.movies().len(), 1);
        assert_eq!(
            catalog.lookups.lock().unwrap()[0],
            ("Untitled Project".to_string(), None)
        );
    }

    // Test critique: le futur de trending doit être Send (exigé par les resolvers GraphQL)
    #[tokio::test]
    async fn test_trending_future_runs_on_spawned_task() {
        let catalog = MockCatalog::default().with_record(movie("tt1", "Heat", "1995"), 0);
        let (service, _, _) = build_service(catalog, Some(trending_page(&[("Heat", "1995-12-15")], 1)));
        let service = Arc::new(service);

        let result = tokio::spawn(async move { service.trending_movies(Some(1)).await })
            .await
            .unwrap();

        assert_eq!(result.movies().len(), 1);
        assert_eq!(result.movies()[0].imdb_id, "tt1");
    }

    /// TMDb double decoding a raw body like the HTTP adapter does.
    struct RawTrending(&'static str);

    #[async_trait]
    impl TrendingSource for RawTrending {
        async fn trending_week(&self, _page: u32) -> UpstreamResult<TrendingPage> {
            serde_json::from_str(self.0).map_err(|e| UpstreamError::Decode {
                upstream: Upstream::Tmdb,
                message: e.to_string(),
            })
        }
    }

    // Test critique: un corps TMDb mal formé produit l'enveloppe vide "False"
    #[tokio::test]
    async fn test_trending_malformed_body_returns_empty_envelope() {
        for body in [
            "{}",
            r#"{"page": 1}"#,
            r#"{"status_code": 7, "status_message": "Invalid API key", "success": false}"#,
        ] {
            let catalog = Arc::new(MockCatalog::default());
            let service = CatalogService::new(
                CatalogConfig::default(),
                catalog.clone(),
                Arc::new(RawTrending(body)),
            );

            let result = service.trending_movies(Some(1)).await;

            assert_eq!(result, SearchResult::empty(), "body: {body}");
            assert!(catalog.lookups.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_trending_fails_soft_and_normalizes_page() {
        let (service, _, trending) = build_service(MockCatalog::default(), None);

        let result = service.trending_movies(Some(-3)).await;

        assert_eq!(result, SearchResult::empty());
        assert_eq!(*trending.requested.lock().unwrap(), vec![DEFAULT_TRENDING_PAGE]);
    }

    #[tokio::test]
    async fn test_trending_respects_zero_concurrency_config() {
        let catalog = Arc::new(MockCatalog::default().with_record(movie("tt1", "Heat", "1995"), 0));
        let trending = Arc::new(MockTrending {
            page: Some(trending_page(&[("Heat", "1995-12-15")], 1)),
            requested: Mutex::new(Vec::new()),
        });
        let service = CatalogService::new(
            CatalogConfig {
                max_concurrent_lookups: 0,
            },
            catalog,
            trending,
        );

        let result = service.trending_movies(Some(2)).await;
        assert_eq!(result.movies().len(), 1);
    }
}
