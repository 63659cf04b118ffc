use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::{DeliveryEndpoint, EndpointLinkage};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryEndpointRepository: Send + Sync {
    /// 指定した紐付け列の値が `owner_ids` に含まれるプロフィール行を返す。
    async fn find_by_owner_ids(
        &self,
        linkage: EndpointLinkage,
        owner_ids: &[Uuid],
    ) -> anyhow::Result<Vec<DeliveryEndpoint>>;
}
