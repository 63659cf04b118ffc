use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::entity::EndpointLinkage;
use crate::domain::service::MAX_BATCH_SIZE;
use crate::infrastructure::push::ServiceAccountKey;
use crate::usecase::DispatchSettings;

/// Application configuration for notification dispatch server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub push: PushConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 起動前に検出できる設定ミスを弾く。
    fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.auth.base_url)
            .map_err(|e| anyhow::anyhow!("invalid auth.base_url: {}", e))?;
        url::Url::parse(&self.push.endpoint)
            .map_err(|e| anyhow::anyhow!("invalid push.endpoint: {}", e))?;
        if self.push.project_id.is_empty() {
            anyhow::bail!("push.project_id must not be empty");
        }
        if self.push.service_account.client_email.is_empty() {
            anyhow::bail!("push.service_account.client_email must not be empty");
        }
        url::Url::parse(&self.push.service_account.token_uri)
            .map_err(|e| anyhow::anyhow!("invalid push.service_account.token_uri: {}", e))?;
        if self.push.max_concurrency == 0 {
            anyhow::bail!("push.max_concurrency must be at least 1");
        }
        if self.dispatch.linkages.is_empty() {
            anyhow::bail!("dispatch.linkages must list at least one column");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8092
}

/// LogConfig はログ出力の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" の場合はプレーンテキスト、それ以外は JSON。
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// DatabaseConfig はデータベース接続の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    #[serde(default = "empty_secret")]
    pub password: SecretString,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_max_open_conns")]
    pub max_open_conns: u32,
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_ssl_mode() -> String {
    "require".to_string()
}

fn default_max_open_conns() -> u32 {
    10
}

impl DatabaseConfig {
    /// PostgreSQL 接続 URL を生成する。パスワードを含むためログに出力しないこと。
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.name,
            self.ssl_mode
        )
    }
}

/// AuthConfig はホスティング認証基盤によるセッション検証の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub base_url: String,
    /// 認証基盤の公開 API キー。照会リクエストの apikey ヘッダーに付与する。
    pub api_key: SecretString,
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_session_cookie() -> String {
    "sb-access-token".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// PushConfig はプッシュゲートウェイの接続設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    pub service_account: ServiceAccountConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 1 バッチ内で同時に送信するメッセージ数の上限。
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_push_endpoint() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_max_concurrency() -> usize {
    16
}

/// ServiceAccountConfig はアクセストークン発行用のサービスアカウント鍵を表す。
/// 値はサービスアカウントの JSON 鍵ファイルの同名フィールドから転記する。
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountConfig {
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl From<&ServiceAccountConfig> for ServiceAccountKey {
    fn from(cfg: &ServiceAccountConfig) -> Self {
        Self {
            client_email: cfg.client_email.clone(),
            private_key: cfg.private_key.clone(),
            token_uri: cfg.token_uri.clone(),
        }
    }
}

/// DispatchConfig は通知配信ユースケースの調整値を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_linkages")]
    pub linkages: Vec<EndpointLinkage>,
    #[serde(default = "default_route")]
    pub default_route: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            linkages: default_linkages(),
            default_route: default_route(),
        }
    }
}

impl From<&DispatchConfig> for DispatchSettings {
    fn from(cfg: &DispatchConfig) -> Self {
        Self {
            batch_size: cfg.batch_size,
            linkages: cfg.linkages.clone(),
            default_route: cfg.default_route.clone(),
        }
    }
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_linkages() -> Vec<EndpointLinkage> {
    vec![EndpointLinkage::Id, EndpointLinkage::UserId]
}

fn default_route() -> String {
    "/notifications".to_string()
}
