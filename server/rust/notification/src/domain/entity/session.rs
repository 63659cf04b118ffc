use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session は認証基盤で検証済みの操作者セッションを表す。
/// 認証ミドルウェアがリクエストエクステンションに格納する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}
