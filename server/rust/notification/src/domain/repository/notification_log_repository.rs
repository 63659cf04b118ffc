use async_trait::async_trait;

use crate::domain::entity::NotificationRecord;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    async fn create_many(&self, records: &[NotificationRecord]) -> anyhow::Result<()>;
}
