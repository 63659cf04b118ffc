use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::infrastructure::SessionVerifier;

/// SessionAuthState は認証ミドルウェアが使用する共有状態。
#[derive(Clone)]
pub struct SessionAuthState {
    pub verifier: Arc<dyn SessionVerifier>,
    /// アクセストークンを保持するセッション Cookie の名前。
    pub session_cookie: String,
}

/// auth_middleware はセッションを検証し、`Session` をリクエストエクステンションに格納する。
/// トークンがない、または検証に失敗した場合は 401 を返し、ハンドラーは実行しない。
pub async fn auth_middleware(
    State(state): State<SessionAuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_access_token(&req, &state.session_cookie) else {
        return unauthorized("SYS_AUTH_MISSING_TOKEN", "authentication required");
    };

    match state.verifier.verify_session(&token).await {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(e) => {
            warn!(error = %e, "session verification failed");
            unauthorized("SYS_AUTH_TOKEN_INVALID", "Unauthorized")
        }
    }
}

fn unauthorized(code: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": code,
        })),
    )
        .into_response()
}

/// Bearer ヘッダーを優先し、なければセッション Cookie からアクセストークンを取り出す。
fn extract_access_token<B>(req: &Request<B>, cookie_name: &str) -> Option<String> {
    extract_bearer_token(req).or_else(|| extract_cookie(req, cookie_name))
}

fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    let auth_header = req.headers().get(axum::http::header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_cookie<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}
