use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::service::PushGatewayError;

/// FCM 送信に必要な OAuth スコープ。
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// 有効期限までの残りがこの秒数を切ったトークンは使わずに再発行する。
const REFRESH_MARGIN_SECS: i64 = 300;

/// ServiceAccountKey はアクセストークンの発行に使うサービスアカウントの資格情報。
#[derive(Debug, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM 形式の RSA 秘密鍵。
    pub private_key: SecretString,
    pub token_uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GrantClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// AccessTokenProvider はサービスアカウント鍵で署名した JWT をトークンエンドポイントに提示し、
/// 得たアクセストークンを期限切れ直前までキャッシュする。
pub struct AccessTokenProvider {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl AccessTokenProvider {
    /// 秘密鍵はここで解析し、不正な鍵は起動時に検出する。
    pub fn new(key: &ServiceAccountKey, client: Client) -> Result<Self, PushGatewayError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| {
                PushGatewayError::AuthenticationFailed(format!("invalid service account key: {}", e))
            })?;
        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            signing_key,
            client,
            cached: RwLock::new(None),
        })
    }

    /// 有効なアクセストークンを返す。キャッシュが無いか期限が近い場合は再発行する。
    pub async fn access_token(&self) -> Result<SecretString, PushGatewayError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // 二重チェック
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }
        let fresh = self.mint().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// 送信先に拒否されたトークンを破棄し、次回の呼び出しで再発行させる。
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    fn build_assertion(&self, issued_at: i64) -> Result<String, PushGatewayError> {
        let claims = GrantClaims {
            iss: self.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key).map_err(|e| {
            PushGatewayError::AuthenticationFailed(format!("failed to sign token grant: {}", e))
        })
    }

    async fn mint(&self) -> Result<CachedToken, PushGatewayError> {
        let assertion = self.build_assertion(Utc::now().timestamp())?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| PushGatewayError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(PushGatewayError::AuthenticationFailed(format!(
                "token endpoint returned {}: {}",
                status, body_text
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            PushGatewayError::AuthenticationFailed(format!("malformed token response: {}", e))
        })?;
        info!(expires_in = token.expires_in, "push access token issued");

        Ok(CachedToken {
            value: SecretString::new(token.access_token),
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        })
    }
}
