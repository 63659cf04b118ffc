use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::Recipient;
use crate::domain::repository::UserDirectoryRepository;

pub struct UserDirectoryPostgresRepository {
    pool: PgPool,
}

impl UserDirectoryPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: Option<String>,
    email: Option<String>,
    store: Option<String>,
    occupation: Option<String>,
}

impl From<UserRow> for Recipient {
    fn from(r: UserRow) -> Self {
        Recipient {
            id: r.id,
            full_name: r.full_name,
            email: r.email,
            store: r.store,
            occupation: r.occupation,
        }
    }
}

/// 職種検索に使う ILIKE パターン。値に含まれる `%` や `_` はワイルドカードとしてそのまま扱う。
fn occupation_pattern(occupation: &str) -> String {
    format!("%{}%", occupation)
}

#[async_trait]
impl UserDirectoryRepository for UserDirectoryPostgresRepository {
    async fn find_by_store(&self, store: &str) -> anyhow::Result<Vec<Recipient>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, full_name, email, store, occupation FROM users WHERE store = $1",
        )
        .bind(store)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_occupation(&self, occupation: &str) -> anyhow::Result<Vec<Recipient>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, full_name, email, store, occupation FROM users WHERE occupation ILIKE $1",
        )
        .bind(occupation_pattern(occupation))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
