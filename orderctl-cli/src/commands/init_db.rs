//! Schema bootstrap command

use anyhow::{Context, Result};
use orderctl_server::{ensure_schema, SchemaOutcome};

use super::DbArgs;

/// Create tables and seed fixtures if the store is empty.
pub async fn run_init_db(db: DbArgs) -> Result<()> {
    let store = db.open_store()?;

    let outcome = ensure_schema(&store)
        .await
        .context("Failed to initialize database")?;

    match outcome {
        SchemaOutcome::Created => println!("Database initialized with seed orders"),
        SchemaOutcome::AlreadyInitialized => println!("Database already initialized, nothing to do"),
    }
    Ok(())
}
