use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::{AppState, ErrorResponse};
use crate::domain::entity::Session;
use crate::usecase::dispatch_notification::{
    DispatchNotificationError, DispatchNotificationInput, DispatchNotificationOutput,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchNotificationRequest {
    /// "store" または "occupation"
    pub target_type: String,
    pub target_value: String,
    pub title: String,
    /// `@` は会員ごとの呼び名に置き換えられる
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchNotificationResponse {
    pub success_count: usize,
    pub total_attempted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<DispatchNotificationOutput> for DispatchNotificationResponse {
    fn from(output: DispatchNotificationOutput) -> Self {
        Self {
            success_count: output.success_count,
            total_attempted: output.total_attempted,
            message: output.message,
        }
    }
}

/// POST /api/v1/notifications/dispatch
#[utoipa::path(
    post,
    path = "/api/v1/notifications/dispatch",
    request_body = DispatchNotificationRequest,
    responses(
        (status = 200, description = "Dispatch finished", body = DispatchNotificationResponse),
        (status = 400, description = "Unknown target type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Directory query failed", body = ErrorResponse),
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn dispatch_notification(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<DispatchNotificationRequest>,
) -> Result<(StatusCode, Json<DispatchNotificationResponse>), DispatchNotificationError> {
    info!(
        operator_id = %session.user_id,
        target_type = %req.target_type,
        target_value = %req.target_value,
        "notification dispatch requested"
    );

    let input = DispatchNotificationInput {
        target_type: req.target_type,
        target_value: req.target_value,
        title: req.title,
        message: req.message,
    };

    let output = state.dispatch_notification_uc.execute(&input).await?;
    Ok((StatusCode::OK, Json(output.into())))
}
