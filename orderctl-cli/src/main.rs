//! orderctl CLI - order management backend
//!
//! - `serve`: HTTP API (schema bootstrap, then listen)
//! - `init-db`: one-shot schema bootstrap and seeding
//! - `orders`: list, create and extend orders directly against the store

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::DbArgs;

#[derive(Parser, Debug)]
#[command(
    name = "orderctl",
    author,
    version,
    about = "Order management backend: nested order listing over PostgreSQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create tables and seed fixtures if the database is empty
    InitDb(DbArgs),
    /// Work with orders (list, create, add-item)
    Orders(commands::OrdersArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so clap's env fallbacks see .env values
    let loaded = config::load_dotenv()?;
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })
        .context("Failed to initialize logging")?;
    for path in &loaded {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(db) => commands::run_init_db(db).await?,
        Commands::Orders(args) => commands::run_orders(args).await?,
    }
    Ok(())
}
