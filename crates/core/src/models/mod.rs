//! Domain models for upstream movie data.
//!
//! OMDb types mirror the upstream JSON exactly (PascalCase field names,
//! string-encoded numbers) so an OMDb envelope can be passed through to the
//! GraphQL layer without normalization. TMDb types only carry the fields the
//! trending fan-out needs.

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// OMDb's `Response` value for a successful answer.
pub const RESPONSE_TRUE: &str = "True";
/// OMDb's `Response` value for a failed or empty answer.
pub const RESPONSE_FALSE: &str = "False";

// =============================================================================
// OMDb
// =============================================================================

/// A movie record as OMDb returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// IMDb identifier (e.g. `tt1375666`).
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Release year as text; series carry a range such as `2008–2013`.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Record type (`movie`, `series`, `episode`).
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Poster URL or the literal `"N/A"`.
    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl Movie {
    /// Whether every field the schema declares non-null is populated.
    pub fn is_complete(&self) -> bool {
        !self.imdb_id.is_empty()
            && !self.title.is_empty()
            && !self.year.is_empty()
            && !self.kind.is_empty()
    }
}

/// The `{Search, totalResults, Response}` envelope.
///
/// Returned by OMDb's `s=` search and reused as the result shape of the
/// trending query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "Search", default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<Movie>>,
    /// Total number of matches across all pages, string-encoded.
    #[serde(rename = "totalResults", default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<String>,
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default = "response_false")]
    pub response: String,
    /// Reason text OMDb sends alongside `Response: "False"`.
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn response_false() -> String {
    RESPONSE_FALSE.to_string()
}

impl SearchResult {
    /// The envelope returned whenever an upstream call fails.
    pub fn empty() -> Self {
        Self {
            search: Some(Vec::new()),
            total_results: Some("0".to_string()),
            response: RESPONSE_FALSE.to_string(),
            error: None,
        }
    }

    /// A successful envelope around `movies`.
    pub fn found(movies: Vec<Movie>, total_results: impl ToString) -> Self {
        Self {
            search: Some(movies),
            total_results: Some(total_results.to_string()),
            response: RESPONSE_TRUE.to_string(),
            error: None,
        }
    }

    /// The envelope OMDb sends when nothing matched.
    pub fn no_match(reason: Option<String>) -> Self {
        Self {
            search: None,
            total_results: None,
            response: RESPONSE_FALSE.to_string(),
            error: reason,
        }
    }

    /// Whether upstream answered `Response: "True"`.
    pub fn is_success(&self) -> bool {
        self.response == RESPONSE_TRUE
    }

    /// Matches carried by this envelope (empty when `Search` is absent).
    pub fn movies(&self) -> &[Movie] {
        self.search.as_deref().unwrap_or_default()
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// OMDb's single-record envelope (`t=` lookup).
///
/// On success the movie fields sit at the top level next to `Response`;
/// on failure only `Response` and `Error` are present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TitleLookup {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "Response", default = "response_false")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl TitleLookup {
    /// Whether upstream answered `Response: "True"`.
    pub fn is_success(&self) -> bool {
        self.response == RESPONSE_TRUE
    }
}

/// Parameters of an OMDb title search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text title (`s=`).
    pub title: String,
    /// Release year filter (`y=`).
    pub year: Option<String>,
    /// 1-based result page (`page=`).
    pub page: Option<i32>,
}

impl SearchQuery {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: Option<String>) -> Self {
        self.year = year.filter(|y| !y.trim().is_empty());
        self
    }

    pub fn with_page(mut self, page: Option<i32>) -> Self {
        self.page = page;
        self
    }
}

// =============================================================================
// TMDb
// =============================================================================

/// One page of TMDb's weekly trending movies.
///
/// `results` and `total_results` are required: a body without them (such as
/// TMDb's `{"success": false}` error shape) fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrendingPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<TrendingTitle>,
    #[serde(default)]
    pub total_pages: u32,
    pub total_results: u64,
}

/// A trending entry. Only the fields used to find the OMDb record are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrendingTitle {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    /// `YYYY-MM-DD`, sometimes empty for unreleased titles.
    #[serde(default)]
    pub release_date: Option<String>,
}

impl TrendingTitle {
    /// Leading segment of `release_date` before the first `-`.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .map(str::trim)
            .filter(|year| !year.is_empty())
    }
}

// =============================================================================
// Outcome classification
// =============================================================================

/// How an upstream call ended.
///
/// The external contract collapses all three cases into an empty result;
/// the distinction is kept for logging and metrics.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Upstream answered with data.
    Found(T),
    /// Upstream answered `Response: "False"`.
    NoMatch { reason: Option<String> },
    /// Transport, status or decode failure.
    Failed(UpstreamError),
}

impl<T> Outcome<T> {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Found(_) => "found",
            Outcome::NoMatch { .. } => "no_match",
            Outcome::Failed(_) => "failed",
        }
    }

    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            _ => None,
        }
    }
}
