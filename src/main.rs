//! Bias Lab - HTTP server entry point
//!
//! Reads configuration from flags or the environment, restores any session
//! snapshot, serves the API until Ctrl-C, then writes the snapshot back.

use bias_lab::api::{create_router, AppState};
use bias_lab::core::config::ServerConfig;
use bias_lab::core::error::{LabError, Result};
use bias_lab::engine::{snapshot, SessionStore, StoreConfig};

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Bias Lab - interactive growth and decision-bias scenarios over HTTP
#[derive(Parser, Debug)]
#[command(name = "bias-lab")]
#[command(about = "Serve the Bias Lab scenarios, quizzes and calculators")]
struct Args {
    /// Bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listening port
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Idle seconds before a session is evicted
    #[arg(long, env = "SESSION_TTL_SECONDS", default_value_t = 7200)]
    session_ttl_seconds: u64,

    /// Maximum number of live sessions
    #[arg(long, env = "MAX_SESSIONS", default_value_t = 10_000)]
    max_sessions: usize,

    /// debug, info, warn or error
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Seconds between background eviction sweeps (0 disables the sweeper)
    #[arg(long, env = "SWEEP_INTERVAL_SECONDS", default_value_t = 60)]
    sweep_interval_seconds: u64,

    /// JSON file for session snapshots, written on shutdown and read on startup
    #[arg(long, env = "SESSION_SNAPSHOT_PATH")]
    snapshot_path: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            session_ttl: Duration::from_secs(self.session_ttl_seconds),
            max_sessions: self.max_sessions,
            sweep_interval: Duration::from_secs(self.sweep_interval_seconds),
            snapshot_path: self.snapshot_path,
            log_level: self.log_level.to_ascii_lowercase(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();
    config.validate().map_err(LabError::Config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Bias Lab starting...");

    let state = AppState::builtin(StoreConfig {
        session_ttl: config.session_ttl,
        max_sessions: config.max_sessions,
    })?;
    tracing::info!(
        scenarios = state.catalog.len(),
        questions = state.quiz.len(),
        "Catalogues loaded"
    );

    if let Some(path) = &config.snapshot_path {
        if let Err(e) = snapshot::load(&state.store, path) {
            tracing::warn!(path = %path.display(), "Ignoring unreadable snapshot: {}", e);
        }
    }

    if !config.sweep_interval.is_zero() {
        spawn_sweeper(state.store.clone(), config.sweep_interval);
    }

    let store = state.store.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    if let Some(path) = &config.snapshot_path {
        snapshot::save(&store, path)?;
    }

    Ok(())
}

/// Periodically evict idle sessions through the same locks as request handlers
fn spawn_sweeper(store: Arc<SessionStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            store.evict_expired();
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
