//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The connection string is
//! parsed before any network activity so a malformed URL never reaches the
//! server.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::deadline::Deadline;
use crate::error::{AlbumError, Result};

/// Create a PostgreSQL connection pool within the run deadline.
///
/// # Errors
///
/// - `InvalidConnectionString` if the URL does not parse
/// - `Connection` if no connection can be established
/// - `Timeout` if the deadline passes first
pub async fn create_pool(config: &ClientConfig, deadline: &Deadline) -> Result<PgPool> {
    let options = config.connect_options()?;

    // Never wait on the pool longer than the run has left.
    let acquire_timeout = config.acquire_timeout.min(deadline.remaining());
    if acquire_timeout.is_zero() {
        return Err(AlbumError::timeout("pool creation"));
    }

    debug!(
        host = options.get_host(),
        port = options.get_port(),
        max_connections = config.max_connections,
        acquire_timeout_ms = acquire_timeout.as_millis() as u64,
        "connecting"
    );

    let pool = deadline
        .run("pool creation", async {
            pool_options(config.max_connections, acquire_timeout)
                .connect_with(options)
                .await
                .map_err(|source| {
                    AlbumError::connection("unable to create connection pool", source)
                })
        })
        .await?;

    info!("connection pool ready");
    Ok(pool)
}

fn pool_options(max_connections: u32, acquire_timeout: Duration) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
}
