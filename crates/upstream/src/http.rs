//! Shared HTTP plumbing for the REST adapters.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::trace;
use url::Url;

use cinegraph_core::error::{Upstream, UpstreamError, UpstreamResult};

/// User agent sent to both upstreams.
const USER_AGENT: &str = concat!("cinegraph/", env!("CARGO_PKG_VERSION"));

/// Query parameters holding credentials.
const SECRET_PARAMS: &[&str] = &["apikey", "api_key"];

/// Build an HTTP client (one connection pool) that both adapters can share
/// through `with_http_client`.
pub fn shared_client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// Build the HTTP client used when the caller doesn't provide one.
pub(crate) fn default_client(upstream: Upstream) -> UpstreamResult<Client> {
    shared_client().map_err(|e| UpstreamError::Transport {
        upstream,
        message: e.to_string(),
    })
}

/// Parse a configured base URL.
pub(crate) fn parse_base_url(upstream: Upstream, base_url: &str) -> UpstreamResult<Url> {
    let url = Url::parse(base_url).map_err(|_| UpstreamError::InvalidUrl {
        upstream,
        url: base_url.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(UpstreamError::InvalidUrl {
            upstream,
            url: base_url.to_string(),
        });
    }

    Ok(url)
}

/// GET `url` and decode a 2xx JSON body into `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    upstream: Upstream,
    url: Url,
) -> UpstreamResult<T> {
    trace!(upstream = %upstream, url = %redact(&url), "GET");

    // `without_url` keeps the API key out of error messages.
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| UpstreamError::Transport {
            upstream,
            message: e.without_url().to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            upstream,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::Transport {
            upstream,
            message: e.without_url().to_string(),
        })?;

    serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
        upstream,
        message: e.to_string(),
    })
}

/// Render `url` with credential parameters masked.
pub(crate) fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if SECRET_PARAMS.iter().any(|param| *param == key) {
                "****".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    if !pairs.is_empty() {
        masked.query_pairs_mut().clear().extend_pairs(pairs);
    }

    masked.to_string()
}
