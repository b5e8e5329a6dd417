//! The default run: who am I, what does an artist have, add one, count.

use std::io::Write;

use albumctl_core::{format_albums, AlbumClient, Decimal, NewAlbum};
use anyhow::Result;
use clap::Args;
use tracing::info;

pub const DEFAULT_ARTIST: &str = "John Coltrane";
pub const DEFAULT_TITLE: &str = "Abbey Road";
pub const DEFAULT_INSERT_ARTIST: &str = "Beatles";

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DemoArgs {
    /// Artist to look up
    #[arg(long, default_value = DEFAULT_ARTIST)]
    pub artist: String,

    /// Title of the album to insert
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Artist of the album to insert
    #[arg(long, default_value = DEFAULT_INSERT_ARTIST)]
    pub insert_artist: String,

    /// Price of the album to insert
    #[arg(long, default_value = "10")]
    pub price: Decimal,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            artist: DEFAULT_ARTIST.to_string(),
            title: DEFAULT_TITLE.to_string(),
            insert_artist: DEFAULT_INSERT_ARTIST.to_string(),
            price: Decimal::from(10),
        }
    }
}

impl DemoArgs {
    fn new_album(&self) -> NewAlbum {
        NewAlbum::new(self.title.clone(), self.insert_artist.clone(), self.price)
    }
}

pub async fn run_demo(client: &AlbumClient, args: &DemoArgs, out: &mut impl Write) -> Result<()> {
    let user = client.current_user().await?;
    writeln!(out, "Current user is '{}'", user)?;

    let albums = client.albums_by_artist(&args.artist).await?;
    writeln!(out, "Albums found: {}", format_albums(&albums))?;

    let album = args.new_album();
    client.add_album(&album).await?;
    info!(title = %album.title, artist = %album.artist, "album added");

    let count = client.row_count().await?;
    writeln!(out, "Number of rows in album: {}", count)?;

    Ok(())
}
