//! HTTP server command
//!
//! Runs the calcapi HTTP server with the history and user routes.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use calcapi_server::{run_server, ServerConfig};

use super::db_args::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:5000)
    #[arg(long, short = 'b', env = "CALCAPI_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Only accept browser requests from localhost origins
    #[arg(long)]
    pub strict_cors: bool,

    /// Exit if the tables can't be created instead of serving anyway
    #[arg(long)]
    pub strict_schema: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting calcapi server on {}", args.bind);

    let pool = args.db.pool()?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: !args.strict_cors,
        strict_schema: args.strict_schema,
    };

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
