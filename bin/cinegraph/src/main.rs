//! Cinegraph - GraphQL gateway over OMDb and TMDb.
//!
//! # Usage
//!
//! ```bash
//! # Start with keys from the environment (or a .env file)
//! OMDB_API_KEY=xxxx TMDB_API_KEY=yyyy cinegraph
//!
//! # Override the port and log as JSON
//! cinegraph --graphql-port 8080 --json-logs
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tokio::sync::watch;
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cinegraph_core::error::GatewayResult;
use cinegraph_core::metrics::init_metrics;
use cinegraph_core::services::{CatalogConfig, CatalogService};
use cinegraph_graphql::{ServerConfig, build_schema, serve_with_shutdown};
use cinegraph_upstream::{
    OmdbClient, OmdbClientConfig, TmdbClient, TmdbClientConfig, shared_client,
};

/// Cinegraph CLI - movie search GraphQL gateway.
#[derive(Parser, Debug)]
#[command(name = "cinegraph")]
#[command(about = "Cinegraph - GraphQL gateway over OMDb and TMDb")]
#[command(version)]
struct Cli {
    /// OMDb API key.
    #[arg(long, env = "OMDB_API_KEY", default_value = "", hide_env_values = true)]
    omdb_api_key: String,

    /// TMDb API key.
    #[arg(long, env = "TMDB_API_KEY", default_value = "", hide_env_values = true)]
    tmdb_api_key: String,

    /// OMDb API root.
    #[arg(long, env = "OMDB_API_URL", default_value = "http://www.omdbapi.com/")]
    omdb_api_url: String,

    /// TMDb API root (including the version segment).
    #[arg(long, env = "TMDB_API_URL", default_value = "https://api.themoviedb.org/3")]
    tmdb_api_url: String,

    /// GraphQL server bind address.
    #[arg(long, env = "GRAPHQL_HOST", default_value = "0.0.0.0")]
    graphql_host: String,

    /// GraphQL server port.
    #[arg(long, env = "GRAPHQL_PORT", default_value = "4000")]
    graphql_port: u16,

    /// Prometheus metrics port.
    #[arg(long, env = "METRICS_PORT", default_value = "9090")]
    metrics_port: u16,

    /// Maximum concurrent OMDb lookups while resolving trending titles.
    #[arg(long, env = "MAX_CONCURRENT_LOOKUPS", default_value = "8", value_parser = parse_concurrency)]
    max_concurrent_lookups: usize,

    /// Do not serve the GraphiQL playground on `/`.
    #[arg(long, env = "DISABLE_PLAYGROUND")]
    disable_playground: bool,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Parse the lookup concurrency limit.
fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Concurrency limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid concurrency limit '{}'", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    // Prometheus metrics exporter (optional - failures don't crash the app)
    let metrics_enabled = match format!("0.0.0.0:{}", cli.metrics_port).parse::<std::net::SocketAddr>() {
        Ok(metrics_addr) => {
            match PrometheusBuilder::new()
                .with_http_listener(metrics_addr)
                .install()
            {
                Ok(()) => {
                    init_metrics();
                    true
                }
                Err(e) => {
                    warn!("⚠️  Failed to start metrics exporter: {}. Continuing without metrics.", e);
                    false
                }
            }
        }
        Err(e) => {
            warn!("⚠️  Invalid metrics address: {}. Continuing without metrics.", e);
            false
        }
    };

    // ─────────────────────────────────────────────────────────────────────────
    // 🚀 STARTUP
    // ─────────────────────────────────────────────────────────────────────────
    info!("🚀 Starting Cinegraph");
    debug!(omdb = %cli.omdb_api_url, tmdb = %cli.tmdb_api_url, "Upstream endpoints");

    if cli.omdb_api_key.is_empty() {
        warn!("⚠️  OMDB_API_KEY is not set, searches will return empty results");
    }
    if cli.tmdb_api_key.is_empty() {
        warn!("⚠️  TMDB_API_KEY is not set, trending will return empty results");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 🎬 UPSTREAMS
    // ─────────────────────────────────────────────────────────────────────────
    let http = shared_client().context("Failed to create HTTP client")?;
    let catalog = Arc::new(build_catalog(&cli, http).context("Failed to create upstream clients")?);

    // ─────────────────────────────────────────────────────────────────────────
    // ⚡ SERVICES START
    // ─────────────────────────────────────────────────────────────────────────
    let (shutdown_tx, mut graphql_shutdown_rx) = watch::channel(false);

    let graphql_config = ServerConfig {
        host: cli.graphql_host.clone(),
        port: cli.graphql_port,
        enable_playground: !cli.disable_playground,
    };

    let schema = build_schema(catalog);
    let graphql_handle = tokio::spawn(
        async move {
            let shutdown_signal = async move {
                while !*graphql_shutdown_rx.borrow() {
                    if graphql_shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            };

            if let Err(e) = serve_with_shutdown(schema, graphql_config, shutdown_signal).await {
                error!(error = %e, "❌ Server error");
            }
            debug!("Server stopped");
        }
        .instrument(info_span!("graphql")),
    );

    // ─────────────────────────────────────────────────────────────────────────
    // ✅ READY
    // ─────────────────────────────────────────────────────────────────────────
    info!("✅ Cinegraph ready");
    info!("   ⚡ GraphQL:  http://localhost:{}/graphql", cli.graphql_port);
    if !cli.disable_playground {
        info!("   🧪 Playground: http://localhost:{}/", cli.graphql_port);
    }
    if metrics_enabled {
        info!(
            "   📊 Metrics:  http://localhost:{}/metrics",
            cli.metrics_port
        );
    } else {
        info!("   📊 Metrics:  disabled");
    }
    info!("   Press Ctrl+C to stop");

    shutdown_signal().await;

    // ─────────────────────────────────────────────────────────────────────────
    // 🛑 SHUTDOWN
    // ─────────────────────────────────────────────────────────────────────────
    info!("🛑 Shutting down...");
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(std::time::Duration::from_secs(10), graphql_handle).await {
        Ok(_) => debug!("GraphQL stopped"),
        Err(_) => warn!("⚠️  GraphQL shutdown timed out"),
    }

    info!("🛑 Shutdown complete");
    Ok(())
}

/// Wire both adapters, sharing one connection pool, into the catalog service.
fn build_catalog(cli: &Cli, http: reqwest::Client) -> GatewayResult<CatalogService> {
    let omdb = OmdbClient::with_http_client(
        OmdbClientConfig {
            base_url: cli.omdb_api_url.clone(),
            api_key: cli.omdb_api_key.clone(),
        },
        http.clone(),
    )?;

    let tmdb = TmdbClient::with_http_client(
        TmdbClientConfig {
            base_url: cli.tmdb_api_url.clone(),
            api_key: cli.tmdb_api_key.clone(),
        },
        http,
    )?;

    Ok(CatalogService::new(
        CatalogConfig {
            max_concurrent_lookups: cli.max_concurrent_lookups,
        },
        Arc::new(omdb),
        Arc::new(tmdb),
    ))
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
