//! Pool-owning client tying config, deadline and repository together.

use sqlx::PgPool;
use tracing::info;

use crate::album::{Album, NewAlbum};
use crate::config::ClientConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::pool::create_pool;
use crate::repo::AlbumRepo;

pub struct AlbumClient {
    pool: PgPool,
    deadline: Deadline,
}

impl AlbumClient {
    /// Start the run deadline and open the pool under it.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let deadline = Deadline::after(config.run_timeout);
        Self::connect_with_deadline(config, deadline).await
    }

    pub async fn connect_with_deadline(config: &ClientConfig, deadline: Deadline) -> Result<Self> {
        let pool = create_pool(config, &deadline).await?;
        Ok(Self { pool, deadline })
    }

    /// Wrap an existing pool, e.g. one handed out by a test harness.
    pub fn from_pool(pool: PgPool, deadline: Deadline) -> Self {
        Self { pool, deadline }
    }

    pub fn repo(&self) -> AlbumRepo<'_> {
        AlbumRepo::new(&self.pool, self.deadline)
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub async fn current_user(&self) -> Result<String> {
        self.repo().current_user().await
    }

    pub async fn albums_by_artist(&self, name: &str) -> Result<Vec<Album>> {
        self.repo().albums_by_artist(name).await
    }

    pub async fn add_album(&self, album: &NewAlbum) -> Result<()> {
        self.repo().add_album(album).await
    }

    pub async fn add_album_returning_id(&self, album: &NewAlbum) -> Result<i64> {
        self.repo().add_album_returning_id(album).await
    }

    pub async fn row_count(&self) -> Result<i64> {
        self.repo().row_count().await
    }

    /// Close every pooled connection. Callers run this on success and error
    /// paths alike.
    pub async fn close(self) {
        self.pool.close().await;
        info!("connection pool closed");
    }
}
