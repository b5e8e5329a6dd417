//! Client configuration: connection string, pool sizing and the run deadline.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use tracing::{debug, info};

use crate::error::{AlbumError, Result};

/// Environment variable holding the connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "ALBUMCTL_MAX_CONNECTIONS";
pub const TIMEOUT_SECS_VAR: &str = "ALBUMCTL_TIMEOUT_SECS";

/// Default maximum connections for the pool.
/// The client issues one statement at a time, so a handful is plenty.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
/// Deadline covering pool creation through the last statement.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(10);

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.albumctl/.env
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy never overwrites variables that are already set
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from ~/.albumctl: {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found, using environment variables only");
    } else {
        let paths: Vec<String> = loaded_from.iter().map(|p| p.display().to_string()).collect();
        info!("Loaded configuration from: {}", paths.join(", "));
    }
}

/// Get the albumctl config directory path (~/.albumctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".albumctl"))
}

/// Settings needed to open the pool and bound the run.
#[derive(Clone)]
pub struct ClientConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub run_timeout: Duration,
}

impl ClientConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// `DATABASE_URL` is required; the tuning variables are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AlbumError::config(format!("{DATABASE_URL_VAR} not set")))?;

        let mut config = Self::new(database_url);

        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = parse_number(MAX_CONNECTIONS_VAR, &raw)?;
            if config.max_connections == 0 {
                return Err(AlbumError::config(format!(
                    "{MAX_CONNECTIONS_VAR} must be at least 1"
                )));
            }
        }

        if let Some(raw) = lookup(TIMEOUT_SECS_VAR) {
            let secs: u64 = parse_number(TIMEOUT_SECS_VAR, &raw)?;
            if secs == 0 {
                return Err(AlbumError::config(format!("{TIMEOUT_SECS_VAR} must be at least 1")));
            }
            config.run_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Parse the connection string without touching the network.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        PgConnectOptions::from_str(&self.database_url)
            .map_err(|source| AlbumError::InvalidConnectionString { source })
    }

    /// Role name the connection string authenticates as.
    pub fn username(&self) -> Result<String> {
        Ok(self.connect_options()?.get_username().to_string())
    }
}

// Keeps the password out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("database_url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("run_timeout", &self.run_timeout)
            .finish()
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AlbumError::config(format!("{key} must be a positive integer, got '{raw}'")))
}
