//! Repository tests against a live database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p albumctl-core -- --ignored

use std::time::Duration;

use albumctl_core::{AlbumClient, AlbumError, ClientConfig, Deadline, Decimal, NewAlbum};
use sqlx::PgPool;

fn client(pool: PgPool) -> AlbumClient {
    AlbumClient::from_pool(pool, Deadline::after(Duration::from_secs(10)))
}

fn abbey_road() -> NewAlbum {
    NewAlbum::new("Abbey Road", "Beatles", Decimal::from(10))
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn current_user_matches_connection_credentials(pool: PgPool) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let expected = ClientConfig::new(url).username().expect("valid url");

    let user = client(pool).current_user().await.expect("current user");

    assert!(!user.is_empty());
    assert_eq!(user, expected);
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn albums_by_artist_collects_every_match(pool: PgPool) {
    let albums = client(pool)
        .albums_by_artist("John Coltrane")
        .await
        .expect("albums by artist");

    let mut titles: Vec<&str> = albums.iter().map(|a| a.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Blue Train", "Giant Steps"]);
    assert!(albums.iter().all(|a| a.artist == "John Coltrane" && a.id > 0));
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn unknown_artist_yields_empty_list(pool: PgPool) {
    let albums = client(pool)
        .albums_by_artist("Nobody At All")
        .await
        .expect("no matches is not an error");

    assert!(albums.is_empty());
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn insert_increments_row_count_by_one(pool: PgPool) {
    let client = client(pool);

    let before = client.row_count().await.expect("count before");
    client.add_album(&abbey_road()).await.expect("insert");
    let after = client.row_count().await.expect("count after");

    assert_eq!(before, 4);
    assert_eq!(after, before + 1);
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn inserted_album_is_found_by_artist(pool: PgPool) {
    let client = client(pool);

    client.add_album(&abbey_road()).await.expect("insert");
    let albums = client.albums_by_artist("Beatles").await.expect("lookup");

    let found = albums
        .iter()
        .find(|a| a.title == "Abbey Road")
        .expect("inserted album present");
    assert_eq!(found.price, Decimal::from(10));
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn returning_insert_reports_new_id(pool: PgPool) {
    let client = client(pool);

    let id = client
        .add_album_returning_id(&abbey_road())
        .await
        .expect("insert returning id");
    let albums = client.albums_by_artist("Beatles").await.expect("lookup");

    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].id, id);
}

#[sqlx::test]
#[ignore = "requires database"]
async fn missing_table_is_query_error(pool: PgPool) {
    let err = client(pool)
        .albums_by_artist("Beatles")
        .await
        .expect_err("album table does not exist");

    assert!(err.is_query(), "unexpected error: {err}");
    assert!(err.to_string().starts_with("albums by artist \"Beatles\": "));
}

#[sqlx::test(fixtures("album"))]
#[ignore = "requires database"]
async fn expired_deadline_fails_in_flight_operation(pool: PgPool) {
    let client = AlbumClient::from_pool(pool, Deadline::after(Duration::from_millis(1)));
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = client.row_count().await.expect_err("deadline passed");
    assert!(matches!(err, AlbumError::Timeout { ref operation } if operation == "row count"));
}
