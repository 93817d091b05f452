//! Database connection arguments shared by `serve` and `migrate`
//!
//! `--database-url` wins when present; otherwise the discrete `DB_*`
//! settings are assembled into connect options.

use anyhow::{Context, Result};
use clap::Args;
use sqlx::postgres::PgSslMode;
use sqlx::PgPool;

use calcapi_server::db::{create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
use calcapi_server::DbSettings;

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Full connection string (overrides the DB_* settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// TLS mode: disable, allow, prefer, require, verify-ca, verify-full
    #[arg(long, env = "DB_SSLMODE", default_value = "prefer")]
    pub db_ssl_mode: String,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DbArgs {
    pub fn settings(&self) -> Result<DbSettings> {
        if let Some(url) = &self.database_url {
            return Ok(DbSettings::Url(url.clone()));
        }

        let ssl_mode: PgSslMode = self
            .db_ssl_mode
            .parse()
            .with_context(|| format!("invalid ssl mode '{}'", self.db_ssl_mode))?;

        Ok(DbSettings::Parts {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            ssl_mode,
        })
    }

    /// Build the (lazy) pool these arguments describe
    pub fn pool(&self) -> Result<PgPool> {
        let settings = self.settings()?;
        create_pool_with_options(&settings, self.max_connections)
            .context("invalid database settings")
    }
}
