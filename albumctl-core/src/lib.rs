//! albumctl-core: data access for the `album` table
//!
//! Opens a PostgreSQL pool from a connection string and runs the four fixed
//! album operations (current user, albums by artist, insert, row count)
//! under a single run deadline.

pub mod album;
pub mod client;
pub mod config;
pub mod deadline;
pub mod error;
pub mod named;
pub mod pool;
pub mod repo;

pub use album::{format_albums, Album, NewAlbum};
pub use client::AlbumClient;
pub use config::{load_dotenv, ClientConfig};
pub use deadline::Deadline;
pub use error::{AlbumError, Result};
pub use named::{ArgValue, NamedArgs};
pub use repo::AlbumRepo;

// Re-exported so callers can build prices without naming the crate.
pub use rust_decimal::Decimal;
