use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::ErrorResponse;
use crate::usecase::dispatch_notification::DispatchNotificationError;

impl IntoResponse for DispatchNotificationError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DispatchNotificationError::InvalidTargetKind(_) => {
                (StatusCode::BAD_REQUEST, "SYS_NOTIF_INVALID_TARGET_TYPE")
            }
            DispatchNotificationError::DirectoryQueryFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SYS_NOTIF_DIRECTORY_QUERY_FAILED",
            ),
            DispatchNotificationError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SYS_NOTIF_INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(code, &self.to_string());
        (status, Json(body)).into_response()
    }
}
