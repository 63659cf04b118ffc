use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entity::Session;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is invalid or expired")]
    Invalid,

    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// SessionVerifier はリクエストに付与されたアクセストークンからセッションを検証するためのトレイト。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify_session(&self, access_token: &str) -> Result<Session, SessionError>;
}

/// HostedAuthSessionVerifier はホスティング認証基盤の `/auth/v1/user` にトークンを照会して検証する。
pub struct HostedAuthSessionVerifier {
    user_url: String,
    api_key: SecretString,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AuthUserResponse {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl HostedAuthSessionVerifier {
    pub fn new(base_url: &str, api_key: SecretString, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            user_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl SessionVerifier for HostedAuthSessionVerifier {
    async fn verify_session(&self, access_token: &str) -> Result<Session, SessionError> {
        let response = self
            .client
            .get(&self.user_url)
            .bearer_auth(access_token)
            .header("apikey", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let user: AuthUserResponse = response
                    .json()
                    .await
                    .map_err(|e| SessionError::Unavailable(format!("malformed user response: {}", e)))?;
                Ok(Session {
                    user_id: user.id,
                    email: user.email,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SessionError::Invalid),
            status => Err(SessionError::Unavailable(format!(
                "auth service returned {}",
                status
            ))),
        }
    }
}
