use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// NotificationRecord は会員ごとのアプリ内通知履歴の 1 行。
/// 既読の更新は別画面の責務で、配信処理は作成のみ行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(user_id: Uuid, title: String, message: String, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            title,
            message,
            is_read: false,
            created_at,
        }
    }
}
