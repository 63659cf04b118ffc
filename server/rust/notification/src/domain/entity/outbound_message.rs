use std::collections::BTreeMap;

use serde::Serialize;

/// アプリ側で通知タップ時の遷移先を読むデータペイロードのキー。
pub const ROUTE_DATA_KEY: &str = "route";

/// OutboundMessage はプッシュゲートウェイへ渡す 1 端末分のメッセージ。永続化はしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl OutboundMessage {
    pub fn new(device_token: String, title: String, body: String, route: &str) -> Self {
        let mut data = BTreeMap::new();
        data.insert(ROUTE_DATA_KEY.to_string(), route.to_string());
        Self {
            device_token,
            title,
            body,
            data,
        }
    }
}
