//! Schema command: create the tables and exit

use anyhow::{Context, Result};
use clap::Parser;

use calcapi_server::db::ensure_schema;

use super::db_args::DbArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Ensure the schema once; unlike `serve`, failure is an error
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.db.pool()?;

    ensure_schema(&pool)
        .await
        .context("Failed to create tables")?;

    pool.close().await;
    tracing::info!("Schema is up to date");
    Ok(())
}
