//! Album repository
//!
//! Each operation is a single statement against the pool, bounded by the
//! run deadline. Failures carry the operation and its key argument.

use sqlx::PgPool;
use tracing::debug;

use crate::album::{try_get_id, Album, NewAlbum};
use crate::deadline::Deadline;
use crate::error::{AlbumError, Result};

pub const CURRENT_USER_SQL: &str = "select CURRENT_USER";
pub const ALBUMS_BY_ARTIST_SQL: &str = "select * from album where artist = $1";
pub const INSERT_ALBUM_SQL: &str =
    "insert into album (title, artist, price) values (@title, @artist, @price)";
pub const INSERT_ALBUM_RETURNING_ID_SQL: &str =
    "insert into album (title, artist, price) values (@title, @artist, @price) returning id";
pub const ROW_COUNT_SQL: &str = "select count(*) from album";

/// Album repository
pub struct AlbumRepo<'a> {
    pool: &'a PgPool,
    deadline: Deadline,
}

impl<'a> AlbumRepo<'a> {
    pub fn new(pool: &'a PgPool, deadline: Deadline) -> Self {
        Self { pool, deadline }
    }

    /// Role the pool's connections are authenticated as.
    pub async fn current_user(&self) -> Result<String> {
        let context = "current user";
        debug!(sql = CURRENT_USER_SQL, "query");

        self.deadline
            .run(context, async {
                sqlx::query_scalar::<_, String>(CURRENT_USER_SQL)
                    .fetch_one(self.pool)
                    .await
                    .map_err(|e| AlbumError::from_sqlx(context, e))
            })
            .await
    }

    /// All albums by `name`, fully collected. No match is an empty list.
    pub async fn albums_by_artist(&self, name: &str) -> Result<Vec<Album>> {
        let context = format!("albums by artist {:?}", name);
        debug!(sql = ALBUMS_BY_ARTIST_SQL, artist = %name, "query");

        let albums = self
            .deadline
            .run(&context, async {
                sqlx::query_as::<_, Album>(ALBUMS_BY_ARTIST_SQL)
                    .bind(name)
                    .fetch_all(self.pool)
                    .await
                    .map_err(|e| AlbumError::from_sqlx(context.as_str(), e))
            })
            .await?;

        debug!(artist = %name, found = albums.len(), "albums fetched");
        Ok(albums)
    }

    /// Insert `album`. The generated id is not returned.
    pub async fn add_album(&self, album: &NewAlbum) -> Result<()> {
        let context = insert_context(album);
        let statement = album.named_args().rewrite(INSERT_ALBUM_SQL)?;
        debug!(sql = %statement.sql, title = %album.title, artist = %album.artist, "execute");

        let result = self
            .deadline
            .run(&context, async {
                statement
                    .query()
                    .execute(self.pool)
                    .await
                    .map_err(|e| AlbumError::from_sqlx(context.as_str(), e))
            })
            .await?;

        debug!(rows_affected = result.rows_affected(), "album inserted");
        Ok(())
    }

    /// Insert `album` and return the id the database assigned.
    pub async fn add_album_returning_id(&self, album: &NewAlbum) -> Result<i64> {
        let context = insert_context(album);
        let statement = album.named_args().rewrite(INSERT_ALBUM_RETURNING_ID_SQL)?;
        debug!(sql = %statement.sql, title = %album.title, artist = %album.artist, "execute");

        let id = self
            .deadline
            .run(&context, async {
                let row = statement
                    .query()
                    .fetch_one(self.pool)
                    .await
                    .map_err(|e| AlbumError::from_sqlx(context.as_str(), e))?;
                try_get_id(&row).map_err(|e| AlbumError::from_sqlx(context.as_str(), e))
            })
            .await?;

        debug!(id, "album inserted");
        Ok(id)
    }

    /// Number of rows in `album`.
    pub async fn row_count(&self) -> Result<i64> {
        let context = "row count";
        debug!(sql = ROW_COUNT_SQL, "query");

        self.deadline
            .run(context, async {
                sqlx::query_scalar::<_, i64>(ROW_COUNT_SQL)
                    .fetch_one(self.pool)
                    .await
                    .map_err(|e| AlbumError::from_sqlx(context, e))
            })
            .await
    }
}

fn insert_context(album: &NewAlbum) -> String {
    format!("insert album {:?} by {:?}", album.title, album.artist)
}
