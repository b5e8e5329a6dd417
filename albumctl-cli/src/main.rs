//! albumctl CLI - album table client
//!
//! With no subcommand, runs the demo sequence: current user, albums by
//! artist, insert one album, row count. Subcommands run one operation each.

use std::io::Write;
use std::time::Duration;

use albumctl_core::{load_dotenv, AlbumClient, ClientConfig};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::albums::{AddArgs, ListArgs};
use commands::demo::DemoArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "albumctl",
    author,
    version,
    about = "Query and update the album table in PostgreSQL",
    long_about = "Connects to the database named by DATABASE_URL, runs fixed album queries \
                  and prints the results. Any error ends the run with a non-zero exit status."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Connection string (default: $DATABASE_URL)
    #[arg(long, value_name = "URL", global = true)]
    database_url: Option<String>,

    /// Maximum pooled connections (default: $ALBUMCTL_MAX_CONNECTIONS or 5)
    #[arg(long, value_name = "N", global = true, value_parser = clap::value_parser!(u32).range(1..))]
    max_connections: Option<u32>,

    /// Deadline for the whole run in seconds (default: $ALBUMCTL_TIMEOUT_SECS or 10)
    #[arg(long, value_name = "SECS", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// How long to wait for a pooled connection, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    acquire_timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the demo sequence (the default when no subcommand is given)
    Demo(DemoArgs),
    /// Print the database role the connection authenticates as
    Whoami,
    /// List albums by an artist
    List(ListArgs),
    /// Insert an album and print its new id
    Add(AddArgs),
    /// Print the number of rows in the album table
    Count,
}

impl ConnectionArgs {
    /// Flags win over the environment; `DATABASE_URL` is only required when
    /// `--database-url` is absent.
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.database_url {
            Some(url) => ClientConfig::new(url.clone()),
            None => ClientConfig::from_env()?,
        };

        if let Some(max) = self.max_connections {
            config = config.with_max_connections(max);
        }
        if let Some(secs) = self.timeout {
            config = config.with_run_timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = self.acquire_timeout_ms {
            config = config.with_acquire_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    load_dotenv();

    let config = cli.connection.client_config()?;
    let client = AlbumClient::connect(&config)
        .await
        .context("failed to open database")?;

    let mut out = std::io::stdout().lock();
    run(client, cli.command, &mut out).await
}

/// Run one command, then close the pool whichever way the command ended.
async fn run(client: AlbumClient, command: Option<Commands>, out: &mut impl Write) -> Result<()> {
    let outcome = run_command(&client, command, out).await;
    client.close().await;
    outcome
}

async fn run_command(
    client: &AlbumClient,
    command: Option<Commands>,
    out: &mut impl Write,
) -> Result<()> {
    match command.unwrap_or_else(|| Commands::Demo(DemoArgs::default())) {
        Commands::Demo(args) => commands::run_demo(client, &args, out).await,
        Commands::Whoami => commands::run_whoami(client, out).await,
        Commands::List(args) => commands::run_list(client, &args, out).await,
        Commands::Add(args) => commands::run_add(client, &args, out).await,
        Commands::Count => commands::run_count(client, out).await,
    }
}
