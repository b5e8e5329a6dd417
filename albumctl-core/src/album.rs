//! The `album` table row and the values needed to insert one.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::named::NamedArgs;

/// Album record from database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub price: Decimal,
}

impl Album {
    /// An album that has not been stored yet. The database assigns `id`.
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: 0,
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }
}

/// Read the `id` column, which may be declared `serial` or `bigserial`.
pub(crate) fn try_get_id(row: &PgRow) -> Result<i64, sqlx::Error> {
    match row.try_get::<i64, _>("id") {
        Ok(id) => Ok(id),
        Err(_) => row.try_get::<i32, _>("id").map(i64::from),
    }
}

impl<'r> FromRow<'r, PgRow> for Album {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: try_get_id(row)?,
            title: row.try_get("title")?,
            artist: row.try_get("artist")?,
            price: row.try_get("price")?,
        })
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {:?} by {} ({})",
            self.id, self.title, self.artist, self.price
        )
    }
}

/// Values for a new `album` row
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: Decimal,
}

impl NewAlbum {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: Decimal) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// Named arguments `title`, `artist` and `price` for the insert statement.
    pub fn named_args(&self) -> NamedArgs {
        NamedArgs::new()
            .with("title", self.title.as_str())
            .with("artist", self.artist.as_str())
            .with("price", self.price)
    }
}

impl From<Album> for NewAlbum {
    fn from(album: Album) -> Self {
        Self {
            title: album.title,
            artist: album.artist,
            price: album.price,
        }
    }
}

impl From<&Album> for NewAlbum {
    fn from(album: &Album) -> Self {
        Self::new(album.title.clone(), album.artist.clone(), album.price)
    }
}

/// Render albums the way the demo run reports them: `[a, b, ...]`.
pub fn format_albums(albums: &[Album]) -> String {
    let items: Vec<String> = albums.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named::ArgValue;

    #[test]
    fn new_album_has_no_id() {
        let album = Album::new("Abbey Road", "Beatles", Decimal::from(10));
        assert_eq!(album.id, 0);

        let insert = NewAlbum::from(album);
        assert_eq!(insert.title, "Abbey Road");
        assert_eq!(insert.price, Decimal::from(10));
    }

    #[test]
    fn named_args_cover_insert_columns() {
        let args = NewAlbum::new("Blue Train", "John Coltrane", Decimal::new(5699, 2)).named_args();

        assert_eq!(args.len(), 3);
        assert_eq!(args.get("title"), Some(&ArgValue::Text("Blue Train".into())));
        assert_eq!(args.get("artist"), Some(&ArgValue::Text("John Coltrane".into())));
        assert_eq!(args.get("price"), Some(&ArgValue::Decimal(Decimal::new(5699, 2))));
    }

    #[test]
    fn display_and_list_format() {
        let albums = vec![
            Album {
                id: 1,
                title: "Blue Train".into(),
                artist: "John Coltrane".into(),
                price: Decimal::new(5699, 2),
            },
            Album {
                id: 2,
                title: "Giant Steps".into(),
                artist: "John Coltrane".into(),
                price: Decimal::new(6399, 2),
            },
        ];

        assert_eq!(albums[0].to_string(), "#1 \"Blue Train\" by John Coltrane (56.99)");
        assert_eq!(
            format_albums(&albums),
            "[#1 \"Blue Train\" by John Coltrane (56.99), #2 \"Giant Steps\" by John Coltrane (63.99)]"
        );
        assert_eq!(format_albums(&[]), "[]");
    }

    #[test]
    fn serializes_to_json() {
        let album = Album {
            id: 3,
            title: "Abbey Road".into(),
            artist: "Beatles".into(),
            price: Decimal::from(10),
        };
        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["title"], "Abbey Road");
        assert_eq!(json["price"], "10");
    }
}
