//! Server configuration with documented defaults
//!
//! Values arrive from the command line or the environment (see `main.rs`)
//! and are checked once by [`ServerConfig::validate`] before anything binds.

use std::path::PathBuf;
use std::time::Duration;

/// Log levels accepted by `LOG_LEVEL`
pub const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

/// Configuration for the HTTP service and the session table
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // === NETWORK ===
    /// Bind address (IP literal or hostname)
    pub host: String,

    /// TCP port; 0 is rejected so the bound port is always predictable
    pub port: u16,

    // === SESSIONS ===
    /// Idle time after which a session becomes eligible for eviction
    ///
    /// At the default (2 hours) a learner can leave a tab open through a
    /// lecture and still resume the scenario.
    pub session_ttl: Duration,

    /// Maximum number of live sessions
    ///
    /// When full, expired sessions are dropped first, then the least
    /// recently touched one.
    pub max_sessions: usize,

    /// Period of the background sweeper; zero disables it and leaves
    /// eviction to the opportunistic path
    pub sweep_interval: Duration,

    /// Where to write session snapshots on shutdown (and read on startup)
    pub snapshot_path: Option<PathBuf>,

    // === LOGGING ===
    /// One of [`LOG_LEVELS`]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            session_ttl: Duration::from_secs(2 * 60 * 60),
            max_sessions: 10_000,
            sweep_interval: Duration::from_secs(60),
            snapshot_path: None,
            log_level: "info".into(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".into());
        }

        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".into());
        }

        if self.session_ttl.is_zero() {
            return Err("SESSION_TTL_SECONDS must be positive".into());
        }

        if self.max_sessions == 0 {
            return Err("MAX_SESSIONS must be positive".into());
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(format!(
                "LOG_LEVEL '{}' is not one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    /// `tracing` filter directive for this crate and the HTTP layer
    pub fn log_filter(&self) -> String {
        format!("bias_lab={level},tower_http={level}", level = self.log_level)
    }
}
