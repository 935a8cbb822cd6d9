//! Port trait for trending rankings.

use async_trait::async_trait;

use crate::error::UpstreamResult;
use crate::models::TrendingPage;

/// Port trait for weekly trending movies (TMDb).
#[async_trait]
pub trait TrendingSource: Send + Sync {
    /// Fetch one 1-based page of this week's trending movies.
    async fn trending_week(&self, page: u32) -> UpstreamResult<TrendingPage>;
}
