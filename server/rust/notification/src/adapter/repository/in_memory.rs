//! 開発モード（DB 未設定）と統合テストで使うインメモリ実装。

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{DeliveryEndpoint, EndpointLinkage, NotificationRecord, Recipient};
use crate::domain::repository::{
    DeliveryEndpointRepository, NotificationLogRepository, UserDirectoryRepository,
};

pub struct InMemoryUserDirectoryRepository {
    users: RwLock<Vec<Recipient>>,
}

impl InMemoryUserDirectoryRepository {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<Recipient>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

impl Default for InMemoryUserDirectoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryRepository for InMemoryUserDirectoryRepository {
    async fn find_by_store(&self, store: &str) -> anyhow::Result<Vec<Recipient>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.store.as_deref() == Some(store))
            .cloned()
            .collect())
    }

    async fn find_by_occupation(&self, occupation: &str) -> anyhow::Result<Vec<Recipient>> {
        let needle = occupation.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| {
                u.occupation
                    .as_deref()
                    .is_some_and(|o| o.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

pub struct InMemoryDeliveryEndpointRepository {
    endpoints: RwLock<Vec<DeliveryEndpoint>>,
}

impl InMemoryDeliveryEndpointRepository {
    pub fn new() -> Self {
        Self::with_endpoints(Vec::new())
    }

    pub fn with_endpoints(endpoints: Vec<DeliveryEndpoint>) -> Self {
        Self {
            endpoints: RwLock::new(endpoints),
        }
    }
}

impl Default for InMemoryDeliveryEndpointRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryEndpointRepository for InMemoryDeliveryEndpointRepository {
    async fn find_by_owner_ids(
        &self,
        linkage: EndpointLinkage,
        owner_ids: &[Uuid],
    ) -> anyhow::Result<Vec<DeliveryEndpoint>> {
        let endpoints = self.endpoints.read().await;
        Ok(endpoints
            .iter()
            .filter(|e| linkage.owner_of(e).is_some_and(|o| owner_ids.contains(&o)))
            .cloned()
            .collect())
    }
}

pub struct InMemoryNotificationLogRepository {
    records: RwLock<Vec<NotificationRecord>>,
}

impl InMemoryNotificationLogRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn records(&self) -> Vec<NotificationRecord> {
        self.records.read().await.clone()
    }
}

impl Default for InMemoryNotificationLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationLogRepository for InMemoryNotificationLogRepository {
    async fn create_many(&self, records: &[NotificationRecord]) -> anyhow::Result<()> {
        self.records.write().await.extend_from_slice(records);
        Ok(())
    }
}
