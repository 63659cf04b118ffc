use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 表示名を決められない会員に使う既定の呼び名。
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Recipient はユーザーディレクトリから取得した通知対象の会員を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub store: Option<String>,
    pub occupation: Option<String>,
}

impl Recipient {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            full_name: None,
            email: None,
            store: None,
            occupation: None,
        }
    }

    /// 通知文に差し込む呼び名を返す。
    /// 氏名、メールアドレスの `@` より前の部分、`"User"` の順に最初の空でない値を採用する。
    pub fn display_name(&self) -> String {
        if let Some(name) = self.full_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
            .to_string()
    }
}
