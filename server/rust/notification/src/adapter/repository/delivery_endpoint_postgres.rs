use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{DeliveryEndpoint, EndpointLinkage};
use crate::domain::repository::DeliveryEndpointRepository;

pub struct DeliveryEndpointPostgresRepository {
    pool: PgPool,
}

impl DeliveryEndpointPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Option<Uuid>,
    fcm_token: Option<String>,
}

impl From<ProfileRow> for DeliveryEndpoint {
    fn from(r: ProfileRow) -> Self {
        DeliveryEndpoint {
            id: r.id,
            user_id: r.user_id,
            device_token: r.fcm_token,
        }
    }
}

fn select_by_linkage(linkage: EndpointLinkage) -> String {
    format!(
        "SELECT id, user_id, fcm_token FROM profiles WHERE {} = ANY($1)",
        linkage.column()
    )
}

#[async_trait]
impl DeliveryEndpointRepository for DeliveryEndpointPostgresRepository {
    async fn find_by_owner_ids(
        &self,
        linkage: EndpointLinkage,
        owner_ids: &[Uuid],
    ) -> anyhow::Result<Vec<DeliveryEndpoint>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = select_by_linkage(linkage);
        let rows: Vec<ProfileRow> = sqlx::query_as(&sql)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
