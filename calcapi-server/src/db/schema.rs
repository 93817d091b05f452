//! Schema initialization
//!
//! Create-if-absent only, safe to run on every boot. Column types match the
//! tables the service has always used, so existing databases are adopted
//! untouched. Older tables allow NULL `data_hora`; readers cope with that.

use sqlx::PgPool;

/// Ensure `historico` and `usuarios` exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS historico (
            id SERIAL PRIMARY KEY,
            numero1 DECIMAL(10,2) NOT NULL,
            numero2 DECIMAL(10,2) NOT NULL,
            resultado DECIMAL(10,2) NOT NULL,
            data_hora TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_historico_data_hora ON historico (data_hora DESC)",
    )
    .execute(pool)
    .await?;

    tracing::info!("table 'historico' ready");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usuarios (
            id SERIAL PRIMARY KEY,
            nome VARCHAR(100) NOT NULL,
            email VARCHAR(100) UNIQUE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("table 'usuarios' ready");
    Ok(())
}
