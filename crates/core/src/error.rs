//! Error types for the gateway domain layer.
//!
//! This module defines a small hierarchy of error types:
//!
//! - [`UpstreamError`] - Failures talking to OMDb or TMDb
//! - [`GatewayError`] - Top-level startup/orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Upstream Errors
// =============================================================================

/// Which upstream REST API a call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// Open Movie Database (search and canonical records).
    Omdb,
    /// The Movie Database (weekly trending).
    Tmdb,
}

impl Upstream {
    /// Stable lowercase name, used as a log field and metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Omdb => "omdb",
            Upstream::Tmdb => "tmdb",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport, status and decoding failures of an upstream call.
///
/// An upstream answering `Response: "False"` is not an error; see
/// [`crate::models::Outcome::NoMatch`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Request could not be sent or the body could not be read.
    #[error("{upstream} unreachable: {message}")]
    Transport {
        /// Upstream that failed.
        upstream: Upstream,
        /// Error details.
        message: String,
    },

    /// Upstream answered with a non-2xx status code.
    #[error("{upstream} returned HTTP {status}")]
    Status {
        /// Upstream that failed.
        upstream: Upstream,
        /// HTTP status code.
        status: u16,
    },

    /// Body was not the JSON shape we expected.
    #[error("{upstream} returned malformed body: {message}")]
    Decode {
        /// Upstream that failed.
        upstream: Upstream,
        /// Error details.
        message: String,
    },

    /// Configured base URL could not be parsed.
    #[error("Invalid {upstream} URL: {url}")]
    InvalidUrl {
        /// Upstream whose URL is invalid.
        upstream: Upstream,
        /// The offending URL.
        url: String,
    },
}

impl UpstreamError {
    /// The upstream this error came from.
    pub fn upstream(&self) -> Upstream {
        match self {
            UpstreamError::Transport { upstream, .. }
            | UpstreamError::Status { upstream, .. }
            | UpstreamError::Decode { upstream, .. }
            | UpstreamError::InvalidUrl { upstream, .. } => *upstream,
        }
    }

    /// Short failure kind, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
            UpstreamError::InvalidUrl { .. } => "invalid_url",
        }
    }
}

// =============================================================================
// Gateway Errors
// =============================================================================

/// Top-level gateway errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Upstream adapter error.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// HTTP server failed.
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
