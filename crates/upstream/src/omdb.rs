//! OMDb REST client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use cinegraph_core::error::{Upstream, UpstreamResult};
use cinegraph_core::models::{SearchQuery, SearchResult, TitleLookup};
use cinegraph_core::ports::MovieCatalog;

use crate::http::{default_client, get_json, parse_base_url, redact};

/// Configuration for the OMDb client.
#[derive(Clone)]
pub struct OmdbClientConfig {
    /// API root (e.g., "http://www.omdbapi.com/").
    pub base_url: String,
    /// OMDb API key. Not validated; a bad key fails upstream.
    pub api_key: String,
}

impl Default for OmdbClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.omdbapi.com/".to_string(),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for OmdbClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"****")
            .finish()
    }
}

/// OMDb adapter implementing the MovieCatalog port.
pub struct OmdbClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl OmdbClient {
    /// Create a client with its own connection pool.
    pub fn new(config: OmdbClientConfig) -> UpstreamResult<Self> {
        let http = default_client(Upstream::Omdb)?;
        Self::with_http_client(config, http)
    }

    /// Create a client sharing an existing connection pool.
    #[instrument(skip_all, fields(url = %config.base_url))]
    pub fn with_http_client(config: OmdbClientConfig, http: Client) -> UpstreamResult<Self> {
        let base_url = parse_base_url(Upstream::Omdb, &config.base_url)?;
        debug!("OMDb client ready");

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// `?apikey=..&s=..&type=movie[&y=..][&page=..]`
    fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("apikey", &self.api_key)
                .append_pair("s", &query.title)
                .append_pair("type", "movie");
            if let Some(year) = &query.year {
                pairs.append_pair("y", year);
            }
            if let Some(page) = query.page {
                pairs.append_pair("page", &page.to_string());
            }
        }
        url
    }

    /// `?apikey=..&t=..[&y=..]`
    fn lookup_url(&self, title: &str, year: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("apikey", &self.api_key)
                .append_pair("t", title);
            if let Some(year) = year {
                pairs.append_pair("y", year);
            }
        }
        url
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    #[instrument(skip_all, fields(title = %query.title))]
    async fn search(&self, query: &SearchQuery) -> UpstreamResult<SearchResult> {
        let url = self.search_url(query);
        debug!(url = %redact(&url), "Searching OMDb");
        get_json(&self.http, Upstream::Omdb, url).await
    }

    #[instrument(skip(self))]
    async fn find_by_title(&self, title: &str, year: Option<&str>) -> UpstreamResult<TitleLookup> {
        let url = self.lookup_url(title, year);
        get_json(&self.http, Upstream::Omdb, url).await
    }
}
