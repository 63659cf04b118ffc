use async_trait::async_trait;

use crate::domain::entity::OutboundMessage;

/// プッシュゲートウェイが 1 回の呼び出しで受け付けるメッセージ数の上限。
pub const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum PushGatewayError {
    #[error("batch of {size} messages exceeds gateway limit {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("push gateway error: {0}")]
    Other(String),
}

/// SendResponse は 1 メッセージ分の配信結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl SendResponse {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// BatchResponse はバッチ送信の結果。`responses` は入力メッセージと同じ順序で並ぶ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl BatchResponse {
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();
        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}

/// PushGateway は端末へのプッシュ配信を行う外部サービスを表す。
/// プロセス起動時に認証情報付きで一度だけ構築し、ユースケースへ注入する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// 最大 `MAX_BATCH_SIZE` 件のメッセージを送信する。
    /// バッチ全体が送れなかった場合のみ Err を返し、個別の失敗は `responses` に含める。
    async fn send_batch(&self, messages: &[OutboundMessage]) -> Result<BatchResponse, PushGatewayError>;
}
