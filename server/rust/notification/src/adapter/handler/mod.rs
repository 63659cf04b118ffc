pub mod error;
pub mod health;
pub mod notification_handler;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::adapter::middleware::auth::{auth_middleware, SessionAuthState};
use crate::usecase::DispatchNotificationUseCase;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatch_notification_uc: Arc<DispatchNotificationUseCase>,
    pub auth_state: SessionAuthState,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        notification_handler::dispatch_notification,
    ),
    components(schemas(
        notification_handler::DispatchNotificationRequest,
        notification_handler::DispatchNotificationResponse,
        ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
struct ApiDoc;

/// auth_middleware が受け付ける 2 通りの資格情報を OpenAPI のセキュリティスキームとして登録する。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("sb-access-token"))),
        );
    }
}

/// REST API ルーターを構築する。
pub fn router(state: AppState) -> Router {
    // 認証不要のエンドポイント
    let public_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz));

    // 通知配信は有効なセッションを必須とする
    let api_routes = Router::new()
        .route(
            "/api/v1/notifications/dispatch",
            post(notification_handler::dispatch_notification),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.auth_state.clone(),
            auth_middleware,
        ));

    public_routes
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// エラー応答の本文。`error` は人が読むメッセージ、`code` は機械判定用のコード。
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: message.to_string(),
            code: code.to_string(),
        }
    }
}
