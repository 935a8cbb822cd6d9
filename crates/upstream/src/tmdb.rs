//! TMDb REST client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use cinegraph_core::error::{Upstream, UpstreamError, UpstreamResult};
use cinegraph_core::models::TrendingPage;
use cinegraph_core::ports::TrendingSource;

use crate::http::{default_client, get_json, parse_base_url, redact};

/// Configuration for the TMDb client.
#[derive(Clone)]
pub struct TmdbClientConfig {
    /// API root including the version segment (e.g., "https://api.themoviedb.org/3").
    pub base_url: String,
    /// TMDb v3 API key. Not validated; a bad key fails upstream.
    pub api_key: String,
}

impl Default for TmdbClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for TmdbClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"****")
            .finish()
    }
}

/// TMDb adapter implementing the TrendingSource port.
pub struct TmdbClient {
    http: Client,
    trending_url: Url,
    api_key: String,
}

impl TmdbClient {
    /// Create a client with its own connection pool.
    pub fn new(config: TmdbClientConfig) -> UpstreamResult<Self> {
        let http = default_client(Upstream::Tmdb)?;
        Self::with_http_client(config, http)
    }

    /// Create a client sharing an existing connection pool.
    #[instrument(skip_all, fields(url = %config.base_url))]
    pub fn with_http_client(config: TmdbClientConfig, http: Client) -> UpstreamResult<Self> {
        let mut trending_url = parse_base_url(Upstream::Tmdb, &config.base_url)?;
        trending_url
            .path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl {
                upstream: Upstream::Tmdb,
                url: config.base_url.clone(),
            })?
            .pop_if_empty()
            .extend(["trending", "movie", "week"]);

        debug!("TMDb client ready");

        Ok(Self {
            http,
            trending_url,
            api_key: config.api_key,
        })
    }

    /// `<base>/trending/movie/week?api_key=..&page=..`
    fn trending_week_url(&self, page: u32) -> Url {
        let mut url = self.trending_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("page", &page.to_string());
        url
    }
}

#[async_trait]
impl TrendingSource for TmdbClient {
    #[instrument(skip(self))]
    async fn trending_week(&self, page: u32) -> UpstreamResult<TrendingPage> {
        let url = self.trending_week_url(page);
        debug!(url = %redact(&url), "Fetching TMDb trending");
        get_json(&self.http, Upstream::Tmdb, url).await
    }
}
