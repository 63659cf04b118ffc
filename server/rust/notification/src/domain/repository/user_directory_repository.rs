use async_trait::async_trait;

use crate::domain::entity::Recipient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectoryRepository: Send + Sync {
    /// 所属店舗が完全一致する会員を返す。
    async fn find_by_store(&self, store: &str) -> anyhow::Result<Vec<Recipient>>;
    /// 職種が大文字小文字を区別せず部分一致する会員を返す。
    async fn find_by_occupation(&self, occupation: &str) -> anyhow::Result<Vec<Recipient>>;
}
