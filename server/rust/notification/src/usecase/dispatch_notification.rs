use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entity::{
    DeliveryEndpoint, EndpointLinkage, NotificationRecord, OutboundMessage, Recipient, TargetKind,
    TargetSpecification,
};
use crate::domain::repository::{
    DeliveryEndpointRepository, NotificationLogRepository, UserDirectoryRepository,
};
use crate::domain::service::{personalize, PushGateway, MAX_BATCH_SIZE};

pub const NO_RECIPIENTS_MESSAGE: &str = "no recipients found for target";
pub const NO_DELIVERABLE_TOKENS_MESSAGE: &str = "no deliverable device tokens found";

#[derive(Debug, Clone)]
pub struct DispatchNotificationInput {
    pub target_type: String,
    pub target_value: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchNotificationOutput {
    pub success_count: usize,
    pub total_attempted: usize,
    pub message: Option<String>,
}

impl DispatchNotificationOutput {
    fn nothing_to_send(message: &str) -> Self {
        Self {
            success_count: 0,
            total_attempted: 0,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchNotificationError {
    #[error("invalid target type: {0}")]
    InvalidTargetKind(String),

    #[error("directory query failed: {0}")]
    DirectoryQueryFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// DispatchSettings は配信処理の調整値。
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// 1 バッチの件数。`MAX_BATCH_SIZE` を超える値は上限に丸める。
    pub batch_size: usize,
    /// プロフィール行を会員に紐付ける列。この順に照会し、後に処理した行が先の対応を上書きする。
    pub linkages: Vec<EndpointLinkage>,
    /// 通知タップ時にアプリが開く画面。
    pub default_route: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            linkages: vec![EndpointLinkage::Id, EndpointLinkage::UserId],
            default_route: "/notifications".to_string(),
        }
    }
}

impl DispatchSettings {
    fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}

/// DispatchNotificationUseCase は対象会員の解決、配信先トークンの収集、本文の個人化、
/// バッチ送信、通知履歴の一括登録を行う。
///
/// バッチ送信と履歴登録はベストエフォートで、失敗はログに残すのみで呼び出し元へは返さない。
pub struct DispatchNotificationUseCase {
    user_repo: Arc<dyn UserDirectoryRepository>,
    endpoint_repo: Arc<dyn DeliveryEndpointRepository>,
    log_repo: Arc<dyn NotificationLogRepository>,
    push_gateway: Arc<dyn PushGateway>,
    settings: DispatchSettings,
}

impl DispatchNotificationUseCase {
    pub fn new(
        user_repo: Arc<dyn UserDirectoryRepository>,
        endpoint_repo: Arc<dyn DeliveryEndpointRepository>,
        log_repo: Arc<dyn NotificationLogRepository>,
        push_gateway: Arc<dyn PushGateway>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            user_repo,
            endpoint_repo,
            log_repo,
            push_gateway,
            settings,
        }
    }

    pub async fn execute(
        &self,
        input: &DispatchNotificationInput,
    ) -> Result<DispatchNotificationOutput, DispatchNotificationError> {
        let kind: TargetKind = input
            .target_type
            .parse()
            .map_err(|_| DispatchNotificationError::InvalidTargetKind(input.target_type.clone()))?;
        let target = TargetSpecification::new(kind, input.target_value.clone());

        let recipients = self.resolve_audience(&target).await?;
        if recipients.is_empty() {
            info!(target_type = %target.kind, target_value = %target.value, "no recipients matched target");
            return Ok(DispatchNotificationOutput::nothing_to_send(NO_RECIPIENTS_MESSAGE));
        }

        let endpoints = self.resolve_endpoints(&recipients).await?;

        let now = chrono::Utc::now();
        let mut messages = Vec::with_capacity(endpoints.len());
        let mut records = Vec::with_capacity(endpoints.len());
        for recipient in &recipients {
            let Some(token) = endpoints.get(&recipient.id).and_then(DeliveryEndpoint::deliverable_token) else {
                continue;
            };
            let body = personalize(&input.message, &recipient.display_name());
            messages.push(OutboundMessage::new(
                token.to_string(),
                input.title.clone(),
                body.clone(),
                &self.settings.default_route,
            ));
            records.push(NotificationRecord::new(
                recipient.id,
                input.title.clone(),
                body,
                now,
            ));
        }

        if messages.is_empty() {
            info!(
                target_type = %target.kind,
                recipient_count = recipients.len(),
                "no deliverable device tokens for matched recipients"
            );
            return Ok(DispatchNotificationOutput::nothing_to_send(
                NO_DELIVERABLE_TOKENS_MESSAGE,
            ));
        }

        let success_count = self.send_in_batches(&messages).await;

        if let Err(e) = self.log_repo.create_many(&records).await {
            error!(error = %e, record_count = records.len(), "failed to persist notification records");
        }

        info!(
            target_type = %target.kind,
            recipient_count = recipients.len(),
            total_attempted = messages.len(),
            success_count,
            "notification dispatch completed"
        );

        Ok(DispatchNotificationOutput {
            success_count,
            total_attempted: messages.len(),
            message: None,
        })
    }

    async fn resolve_audience(
        &self,
        target: &TargetSpecification,
    ) -> Result<Vec<Recipient>, DispatchNotificationError> {
        let result = match target.kind {
            TargetKind::Store => self.user_repo.find_by_store(&target.value).await,
            TargetKind::Occupation => self.user_repo.find_by_occupation(&target.value).await,
        };
        result.map_err(|e| DispatchNotificationError::DirectoryQueryFailed(e.to_string()))
    }

    /// 会員 id から配信先への対応表を作る。
    /// 紐付け列ごとに照会した結果を設定順に連結し、各行をすべての紐付け列で独立に照合する。
    /// 同じ会員に複数の行が当たった場合は後に処理した行が残る。
    async fn resolve_endpoints(
        &self,
        recipients: &[Recipient],
    ) -> Result<HashMap<Uuid, DeliveryEndpoint>, DispatchNotificationError> {
        let ids: Vec<Uuid> = recipients.iter().map(|r| r.id).collect();
        let id_set: HashSet<Uuid> = ids.iter().copied().collect();

        let mut rows = Vec::new();
        for linkage in &self.settings.linkages {
            let found = self
                .endpoint_repo
                .find_by_owner_ids(*linkage, &ids)
                .await
                .map_err(|e| DispatchNotificationError::Internal(e.to_string()))?;
            rows.extend(found);
        }

        Ok(map_endpoints(rows, &id_set, &self.settings.linkages))
    }

    async fn send_in_batches(&self, messages: &[OutboundMessage]) -> usize {
        let mut success_count = 0;
        for (batch_index, batch) in messages
            .chunks(self.settings.effective_batch_size())
            .enumerate()
        {
            match self.push_gateway.send_batch(batch).await {
                Ok(resp) => {
                    success_count += resp.success_count;
                    for (msg, r) in batch.iter().zip(&resp.responses) {
                        if !r.success {
                            warn!(
                                batch_index,
                                token = %msg.device_token,
                                error = r.error.as_deref().unwrap_or("unknown"),
                                "push message failed"
                            );
                        }
                    }
                }
                Err(e) => {
                    error!(batch_index, batch_size = batch.len(), error = %e, "push batch failed");
                }
            }
        }
        success_count
    }
}

fn map_endpoints(
    rows: Vec<DeliveryEndpoint>,
    id_set: &HashSet<Uuid>,
    linkages: &[EndpointLinkage],
) -> HashMap<Uuid, DeliveryEndpoint> {
    let mut mapped = HashMap::new();
    for row in rows {
        if row.deliverable_token().is_none() {
            continue;
        }
        for linkage in linkages {
            if let Some(owner) = linkage.owner_of(&row).filter(|o| id_set.contains(o)) {
                mapped.insert(owner, row.clone());
            }
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::domain::repository::delivery_endpoint_repository::MockDeliveryEndpointRepository;
    use crate::domain::repository::notification_log_repository::MockNotificationLogRepository;
    use crate::domain::repository::user_directory_repository::MockUserDirectoryRepository;
    use crate::domain::service::push_gateway::MockPushGateway;
    use crate::domain::service::{BatchResponse, PushGatewayError, SendResponse};

    fn recipient(name: Option<&str>, email: Option<&str>) -> Recipient {
        Recipient {
            full_name: name.map(str::to_string),
            email: email.map(str::to_string),
            store: Some("Shibuya".to_string()),
            ..Recipient::new(Uuid::new_v4())
        }
    }

    fn endpoint_for(owner: Uuid, token: Option<&str>) -> DeliveryEndpoint {
        DeliveryEndpoint {
            id: owner,
            user_id: None,
            device_token: token.map(str::to_string),
        }
    }

    fn input(target_type: &str, message: &str) -> DispatchNotificationInput {
        DispatchNotificationInput {
            target_type: target_type.to_string(),
            target_value: "Shibuya".to_string(),
            title: "Points update".to_string(),
            message: message.to_string(),
        }
    }

    /// 全会員について id 紐付けでトークンを返すエンドポイントモック。
    fn endpoints_by_id(recipients: &[Recipient]) -> MockDeliveryEndpointRepository {
        let rows: Vec<DeliveryEndpoint> = recipients
            .iter()
            .enumerate()
            .map(|(i, r)| endpoint_for(r.id, Some(format!("token-{i}").as_str())))
            .collect();
        let mut mock = MockDeliveryEndpointRepository::new();
        mock.expect_find_by_owner_ids()
            .returning(move |linkage, _| match linkage {
                EndpointLinkage::Id => Ok(rows.clone()),
                EndpointLinkage::UserId => Ok(Vec::new()),
            });
        mock
    }

    fn all_delivered(batch: &[OutboundMessage]) -> Result<BatchResponse, PushGatewayError> {
        Ok(BatchResponse::from_responses(
            batch.iter().map(|_| SendResponse::delivered()).collect(),
        ))
    }

    fn usecase(
        user_repo: MockUserDirectoryRepository,
        endpoint_repo: MockDeliveryEndpointRepository,
        log_repo: MockNotificationLogRepository,
        gateway: MockPushGateway,
    ) -> DispatchNotificationUseCase {
        DispatchNotificationUseCase::new(
            Arc::new(user_repo),
            Arc::new(endpoint_repo),
            Arc::new(log_repo),
            Arc::new(gateway),
            DispatchSettings::default(),
        )
    }

    #[tokio::test]
    async fn invalid_target_kind_touches_no_collaborator() {
        let uc = usecase(
            MockUserDirectoryRepository::new(),
            MockDeliveryEndpointRepository::new(),
            MockNotificationLogRepository::new(),
            MockPushGateway::new(),
        );

        let result = uc.execute(&input("region", "hello")).await;

        match result.unwrap_err() {
            DispatchNotificationError::InvalidTargetKind(kind) => assert_eq!(kind, "region"),
            e => unreachable!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn empty_audience_returns_zero_without_sending() {
        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .withf(|store| store == "Shibuya")
            .returning(|_| Ok(Vec::new()));

        let uc = usecase(
            user_repo,
            MockDeliveryEndpointRepository::new(),
            MockNotificationLogRepository::new(),
            MockPushGateway::new(),
        );

        let output = uc.execute(&input("store", "hello")).await.unwrap();
        assert_eq!(output.success_count, 0);
        assert_eq!(output.message.as_deref(), Some(NO_RECIPIENTS_MESSAGE));
    }

    #[tokio::test]
    async fn occupation_target_uses_pattern_lookup() {
        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_occupation()
            .withf(|occupation| occupation == "nurse")
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let uc = usecase(
            user_repo,
            MockDeliveryEndpointRepository::new(),
            MockNotificationLogRepository::new(),
            MockPushGateway::new(),
        );

        let mut req = input("occupation", "hello");
        req.target_value = "nurse".to_string();
        let output = uc.execute(&req).await.unwrap();
        assert_eq!(output.success_count, 0);
    }

    #[tokio::test]
    async fn directory_failure_aborts_dispatch() {
        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let uc = usecase(
            user_repo,
            MockDeliveryEndpointRepository::new(),
            MockNotificationLogRepository::new(),
            MockPushGateway::new(),
        );

        match uc.execute(&input("store", "hello")).await.unwrap_err() {
            DispatchNotificationError::DirectoryQueryFailed(msg) => {
                assert!(msg.contains("connection reset"));
            }
            e => unreachable!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn recipients_without_tokens_are_skipped_entirely() {
        let reachable = recipient(Some("Asha"), None);
        let empty_token = recipient(Some("Ken"), None);
        let no_row = recipient(Some("Mei"), None);
        let rows = vec![
            endpoint_for(reachable.id, Some("tok-asha")),
            endpoint_for(empty_token.id, Some("")),
        ];
        let users = vec![reachable.clone(), empty_token, no_row];

        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let mut endpoint_repo = MockDeliveryEndpointRepository::new();
        endpoint_repo
            .expect_find_by_owner_ids()
            .returning(move |linkage, _| match linkage {
                EndpointLinkage::Id => Ok(rows.clone()),
                EndpointLinkage::UserId => Ok(Vec::new()),
            });

        let mut gateway = MockPushGateway::new();
        gateway
            .expect_send_batch()
            .withf(|batch| batch.len() == 1 && batch[0].device_token == "tok-asha")
            .times(1)
            .returning(all_delivered);

        let reachable_id = reachable.id;
        let mut log_repo = MockNotificationLogRepository::new();
        log_repo
            .expect_create_many()
            .withf(move |records| records.len() == 1 && records[0].user_id == reachable_id)
            .times(1)
            .returning(|_| Ok(()));

        let uc = usecase(user_repo, endpoint_repo, log_repo, gateway);
        let output = uc.execute(&input("store", "hello")).await.unwrap();
        assert_eq!(output.success_count, 1);
        assert_eq!(output.total_attempted, 1);
        assert_eq!(output.message, None);
    }

    #[tokio::test]
    async fn no_deliverable_tokens_skips_gateway_and_log() {
        let users = vec![recipient(Some("Asha"), None)];
        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let mut endpoint_repo = MockDeliveryEndpointRepository::new();
        endpoint_repo
            .expect_find_by_owner_ids()
            .times(2)
            .returning(|_, _| Ok(Vec::new()));

        let uc = usecase(
            user_repo,
            endpoint_repo,
            MockNotificationLogRepository::new(),
            MockPushGateway::new(),
        );
        let output = uc.execute(&input("store", "hello")).await.unwrap();
        assert_eq!(output.success_count, 0);
        assert_eq!(output.message.as_deref(), Some(NO_DELIVERABLE_TOKENS_MESSAGE));
    }

    #[tokio::test]
    async fn body_is_personalized_and_title_is_unchanged() {
        let asha = recipient(Some("Asha"), None);
        let fallback = recipient(None, Some("asha.k@example.com"));
        let anonymous = recipient(None, None);
        let users = vec![asha, fallback, anonymous];
        let endpoint_repo = endpoints_by_id(&users);

        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let sent = Arc::new(Mutex::new(Vec::new()));
        let sent_clone = sent.clone();
        let mut gateway = MockPushGateway::new();
        gateway.expect_send_batch().returning(move |batch| {
            sent_clone.lock().unwrap().extend(batch.iter().cloned());
            all_delivered(batch)
        });

        let mut log_repo = MockNotificationLogRepository::new();
        log_repo
            .expect_create_many()
            .withf(|records| {
                records.iter().all(|r| !r.is_read)
                    && records[0].message == "Hi Asha, you have Asha points"
            })
            .returning(|_| Ok(()));

        let uc = usecase(user_repo, endpoint_repo, log_repo, gateway);
        uc.execute(&input("store", "Hi @, you have @ points"))
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        let bodies: Vec<&str> = sent.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(
            bodies,
            vec![
                "Hi Asha, you have Asha points",
                "Hi asha.k, you have asha.k points",
                "Hi User, you have User points",
            ]
        );
        assert!(sent.iter().all(|m| m.title == "Points update"));
        assert!(sent
            .iter()
            .all(|m| m.data.get("route").map(String::as_str) == Some("/notifications")));
    }

    #[tokio::test]
    async fn large_audience_is_split_into_gateway_sized_batches() {
        let users: Vec<Recipient> = (0..1200).map(|_| recipient(Some("Asha"), None)).collect();
        let endpoint_repo = endpoints_by_id(&users);

        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let sizes = Arc::new(Mutex::new(Vec::new()));
        let sizes_clone = sizes.clone();
        let mut gateway = MockPushGateway::new();
        gateway.expect_send_batch().times(3).returning(move |batch| {
            sizes_clone.lock().unwrap().push(batch.len());
            // 各バッチの先頭 1 件だけ失敗させる
            let mut responses: Vec<SendResponse> =
                batch.iter().map(|_| SendResponse::delivered()).collect();
            responses[0] = SendResponse::failed("unregistered");
            Ok(BatchResponse::from_responses(responses))
        });

        let mut log_repo = MockNotificationLogRepository::new();
        log_repo
            .expect_create_many()
            .withf(|records| records.len() == 1200)
            .times(1)
            .returning(|_| Ok(()));

        let uc = usecase(user_repo, endpoint_repo, log_repo, gateway);
        let output = uc.execute(&input("store", "hello")).await.unwrap();

        assert_eq!(*sizes.lock().unwrap(), vec![500, 500, 200]);
        assert_eq!(output.success_count, 1197);
        assert_eq!(output.total_attempted, 1200);
    }

    #[tokio::test]
    async fn failed_batch_does_not_stop_remaining_batches() {
        let users: Vec<Recipient> = (0..1200).map(|_| recipient(Some("Asha"), None)).collect();
        let endpoint_repo = endpoints_by_id(&users);

        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let mut gateway = MockPushGateway::new();
        gateway.expect_send_batch().returning(move |batch| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) == 1 {
                Err(PushGatewayError::ConnectionFailed("timed out".to_string()))
            } else {
                all_delivered(batch)
            }
        });

        let mut log_repo = MockNotificationLogRepository::new();
        log_repo
            .expect_create_many()
            .times(1)
            .returning(|_| Ok(()));

        let uc = usecase(user_repo, endpoint_repo, log_repo, gateway);
        let output = uc.execute(&input("store", "hello")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(output.success_count, 700);
    }

    #[tokio::test]
    async fn log_write_failure_keeps_success_count() {
        let users: Vec<Recipient> = (0..3).map(|_| recipient(Some("Asha"), None)).collect();
        let endpoint_repo = endpoints_by_id(&users);

        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let mut gateway = MockPushGateway::new();
        gateway.expect_send_batch().returning(all_delivered);

        let mut log_repo = MockNotificationLogRepository::new();
        log_repo
            .expect_create_many()
            .returning(|_| Err(anyhow::anyhow!("permission denied for table notifications")));

        let uc = usecase(user_repo, endpoint_repo, log_repo, gateway);
        let output = uc.execute(&input("store", "hello")).await.unwrap();
        assert_eq!(output.success_count, 3);
    }

    #[tokio::test]
    async fn recipient_matched_by_both_linkages_is_sent_once() {
        let asha = recipient(Some("Asha"), None);
        let asha_id = asha.id;
        let users = vec![asha];

        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let mut endpoint_repo = MockDeliveryEndpointRepository::new();
        endpoint_repo
            .expect_find_by_owner_ids()
            .returning(move |linkage, _| match linkage {
                EndpointLinkage::Id => Ok(vec![endpoint_for(asha_id, Some("tok-by-id"))]),
                EndpointLinkage::UserId => Ok(vec![DeliveryEndpoint {
                    id: Uuid::new_v4(),
                    user_id: Some(asha_id),
                    device_token: Some("tok-by-user-id".to_string()),
                }]),
            });

        let mut gateway = MockPushGateway::new();
        gateway
            .expect_send_batch()
            .withf(|batch| batch.len() == 1 && batch[0].device_token == "tok-by-user-id")
            .times(1)
            .returning(all_delivered);

        let mut log_repo = MockNotificationLogRepository::new();
        log_repo
            .expect_create_many()
            .withf(|records| records.len() == 1)
            .returning(|_| Ok(()));

        let uc = usecase(user_repo, endpoint_repo, log_repo, gateway);
        let output = uc.execute(&input("store", "hello")).await.unwrap();
        assert_eq!(output.total_attempted, 1);
    }

    #[tokio::test]
    async fn endpoint_query_failure_is_internal_error() {
        let users = vec![recipient(Some("Asha"), None)];
        let mut user_repo = MockUserDirectoryRepository::new();
        user_repo
            .expect_find_by_store()
            .returning(move |_| Ok(users.clone()));

        let mut endpoint_repo = MockDeliveryEndpointRepository::new();
        endpoint_repo
            .expect_find_by_owner_ids()
            .returning(|_, _| Err(anyhow::anyhow!("relation \"profiles\" does not exist")));

        let uc = usecase(
            user_repo,
            endpoint_repo,
            MockNotificationLogRepository::new(),
            MockPushGateway::new(),
        );
        let err = uc.execute(&input("store", "hello")).await.unwrap_err();
        assert!(matches!(err, DispatchNotificationError::Internal(_)));
    }

    #[test]
    fn map_endpoints_applies_last_write_wins_in_linkage_order() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let id_set: HashSet<Uuid> = [owner, other].into_iter().collect();
        let first = endpoint_for(owner, Some("first"));
        let second = DeliveryEndpoint {
            id: other,
            user_id: Some(owner),
            device_token: Some("second".to_string()),
        };

        let mapped = map_endpoints(
            vec![first, second],
            &id_set,
            &[EndpointLinkage::Id, EndpointLinkage::UserId],
        );

        // 2 行目は id で other に、user_id で owner に対応し、owner の先行エントリを上書きする
        assert_eq!(mapped[&owner].device_token.as_deref(), Some("second"));
        assert_eq!(mapped[&other].device_token.as_deref(), Some("second"));
    }

    #[test]
    fn map_endpoints_respects_configured_linkages() {
        let owner = Uuid::new_v4();
        let id_set: HashSet<Uuid> = [owner].into_iter().collect();
        let row = DeliveryEndpoint {
            id: Uuid::new_v4(),
            user_id: Some(owner),
            device_token: Some("tok".to_string()),
        };

        let mapped = map_endpoints(vec![row], &id_set, &[EndpointLinkage::Id]);
        assert!(mapped.is_empty());
    }

    #[test]
    fn batch_size_is_clamped_to_gateway_limit() {
        let settings = DispatchSettings {
            batch_size: 10_000,
            ..DispatchSettings::default()
        };
        assert_eq!(settings.effective_batch_size(), MAX_BATCH_SIZE);

        let settings = DispatchSettings {
            batch_size: 0,
            ..DispatchSettings::default()
        };
        assert_eq!(settings.effective_batch_size(), 1);
    }
}
