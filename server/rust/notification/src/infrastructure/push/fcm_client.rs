use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::error;

use super::access_token::{AccessTokenProvider, ServiceAccountKey};
use crate::domain::entity::OutboundMessage;
use crate::domain::service::{
    BatchResponse, PushGateway, PushGatewayError, SendResponse, MAX_BATCH_SIZE,
};

/// 認証エラーの後に送信を見送ったメッセージの失敗理由。
pub const SKIPPED_AFTER_AUTH_FAILURE: &str = "not sent: push credentials were rejected";

/// FcmPushGateway は FCM HTTP v1 API でメッセージを送信する。
/// バッチ内のメッセージは最大 `max_concurrency` 件を並行して送り、結果は入力順に返す。
pub struct FcmPushGateway {
    send_url: String,
    tokens: AccessTokenProvider,
    client: Client,
    max_concurrency: usize,
}

impl FcmPushGateway {
    pub fn new(
        endpoint: &str,
        project_id: &str,
        service_account: &ServiceAccountKey,
        timeout: Duration,
        max_concurrency: usize,
    ) -> Result<Self, PushGatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushGatewayError::Other(e.to_string()))?;
        let tokens = AccessTokenProvider::new(service_account, client.clone())?;
        Ok(Self {
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                endpoint.trim_end_matches('/'),
                project_id
            ),
            tokens,
            client,
            max_concurrency: max_concurrency.max(1),
        })
    }

    /// 1 件送信する。401/403 を受けたら `rejected` を立て、以降のメッセージは送らずに失敗扱いとする。
    async fn send_one(
        &self,
        message: &OutboundMessage,
        access_token: &SecretString,
        rejected: &AtomicBool,
    ) -> SendResponse {
        if rejected.load(Ordering::Acquire) {
            return SendResponse::failed(SKIPPED_AFTER_AUTH_FAILURE);
        }

        let response = match self
            .client
            .post(&self.send_url)
            .bearer_auth(access_token.expose_secret())
            .json(&build_payload(message))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return SendResponse::failed(e.to_string()),
        };

        let status = response.status();
        if status.is_success() {
            return SendResponse::delivered();
        }

        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown".to_string());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            rejected.store(true, Ordering::Release);
        }

        SendResponse::failed(format!("FCM returned {}: {}", status, body_text))
    }
}

fn build_payload(message: &OutboundMessage) -> serde_json::Value {
    json!({
        "message": {
            "token": message.device_token,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
        }
    })
}

#[async_trait]
impl PushGateway for FcmPushGateway {
    async fn send_batch(&self, messages: &[OutboundMessage]) -> Result<BatchResponse, PushGatewayError> {
        if messages.len() > MAX_BATCH_SIZE {
            return Err(PushGatewayError::BatchTooLarge {
                size: messages.len(),
                limit: MAX_BATCH_SIZE,
            });
        }

        // トークンを取得できなければ 1 件も送っていないのでバッチ全体の失敗とする
        let access_token = self.tokens.access_token().await?;
        let rejected = AtomicBool::new(false);

        let sends: Vec<_> = messages
            .iter()
            .map(|message| self.send_one(message, &access_token, &rejected))
            .collect();
        let responses: Vec<SendResponse> = stream::iter(sends)
            .buffered(self.max_concurrency)
            .collect()
            .await;
        let batch = BatchResponse::from_responses(responses);

        if rejected.load(Ordering::Acquire) {
            self.tokens.invalidate().await;
            error!(
                delivered = batch.success_count,
                failed = batch.failure_count,
                "push credentials rejected, remaining messages in batch were not sent"
            );
        }

        Ok(batch)
    }
}
