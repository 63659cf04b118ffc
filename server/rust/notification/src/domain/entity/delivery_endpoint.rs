use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// DeliveryEndpoint はプロフィールテーブルの 1 行で、端末のプッシュトークンを保持する。
/// 会員との紐付けは `id` と `user_id` のどちらで表現されているかが行ごとに一定しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEndpoint {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub device_token: Option<String>,
}

impl DeliveryEndpoint {
    /// 配信可能なトークンを返す。トークンが未設定または空文字の場合は None。
    pub fn deliverable_token(&self) -> Option<&str> {
        self.device_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// EndpointLinkage はプロフィール行を会員へ紐付ける列を表す。
/// 列名は閉じた列挙から選ばれ、外部入力から SQL に埋め込まれることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointLinkage {
    /// プロフィール行の id が会員 id と一致する
    Id,
    /// プロフィール行の user_id が会員 id と一致する
    UserId,
}

impl EndpointLinkage {
    pub fn column(&self) -> &'static str {
        match self {
            EndpointLinkage::Id => "id",
            EndpointLinkage::UserId => "user_id",
        }
    }

    /// この紐付け列で見たときの行の所有者 id を返す。
    pub fn owner_of(&self, endpoint: &DeliveryEndpoint) -> Option<Uuid> {
        match self {
            EndpointLinkage::Id => Some(endpoint.id),
            EndpointLinkage::UserId => endpoint.user_id,
        }
    }
}
