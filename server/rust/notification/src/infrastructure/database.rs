use sqlx::PgPool;

use super::config::DatabaseConfig;

/// PostgreSQL 接続プールを作成する。`DATABASE_URL` が設定されていればそちらを優先する。
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.connection_url());
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(cfg.max_open_conns)
        .connect(&url)
        .await?;
    Ok(pool)
}
