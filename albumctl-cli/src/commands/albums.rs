//! Single-operation subcommands: whoami, list, add, count.

use std::io::Write;

use albumctl_core::{Album, AlbumClient, Decimal, NewAlbum};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Artist name (exact match)
    pub artist: String,

    /// Print albums as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Album title
    #[arg(long)]
    pub title: String,

    /// Album artist
    #[arg(long)]
    pub artist: String,

    /// Album price, e.g. 9.99
    #[arg(long)]
    pub price: Decimal,
}

pub async fn run_whoami(client: &AlbumClient, out: &mut impl Write) -> Result<()> {
    let user = client.current_user().await?;
    writeln!(out, "{}", user)?;
    Ok(())
}

pub async fn run_list(client: &AlbumClient, args: &ListArgs, out: &mut impl Write) -> Result<()> {
    let albums = client.albums_by_artist(&args.artist).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&albums).context("failed to encode albums")?;
        writeln!(out, "{}", json)?;
    } else {
        write_album_lines(&args.artist, &albums, out)?;
    }
    Ok(())
}

pub async fn run_add(client: &AlbumClient, args: &AddArgs, out: &mut impl Write) -> Result<()> {
    let album = NewAlbum::new(args.title.clone(), args.artist.clone(), args.price);
    let id = client.add_album_returning_id(&album).await?;
    writeln!(out, "Added album {} ({:?} by {})", id, album.title, album.artist)?;
    Ok(())
}

pub async fn run_count(client: &AlbumClient, out: &mut impl Write) -> Result<()> {
    let count = client.row_count().await?;
    writeln!(out, "{}", count)?;
    Ok(())
}

fn write_album_lines(artist: &str, albums: &[Album], out: &mut impl Write) -> Result<()> {
    if albums.is_empty() {
        writeln!(out, "No albums found for {}", artist)?;
        return Ok(());
    }
    for album in albums {
        writeln!(out, "{}", album)?;
    }
    Ok(())
}
