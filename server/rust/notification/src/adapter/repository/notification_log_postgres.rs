use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::NotificationRecord;
use crate::domain::repository::NotificationLogRepository;

/// 1 文あたりの行数上限。PostgreSQL のバインド変数上限 (65535) を 5 列で割った値より小さく取る。
const MAX_ROWS_PER_STATEMENT: usize = 10_000;

pub struct NotificationLogPostgresRepository {
    pool: PgPool,
}

impl NotificationLogPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLogRepository for NotificationLogPostgresRepository {
    /// 全件を 1 トランザクションで登録する。途中で失敗した場合は 1 件も残らない。
    async fn create_many(&self, records: &[NotificationRecord]) -> anyhow::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for chunk in records.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO notifications (user_id, title, message, is_read, created_at) ",
            );
            builder.push_values(chunk, |mut b, record| {
                b.push_bind(record.user_id)
                    .push_bind(&record.title)
                    .push_bind(&record.message)
                    .push_bind(record.is_read)
                    .push_bind(record.created_at);
            });
            builder.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
