use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hoso_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::InvalidModule(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            AppError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use hoso_core::AppError;

    use super::ApiError;

    #[test]
    fn session_failures_map_to_401() {
        let response =
            ApiError::from(AppError::Unauthenticated("authentication required".to_owned()))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn missing_permission_maps_to_403() {
        let error = ApiError::from(AppError::Unauthorized {
            permission: "VIEW_BO_LUAT".to_owned(),
        });
        assert_eq!(error.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn persistence_failures_keep_their_categories() {
        assert_eq!(
            ApiError::from(AppError::Transient("pool timed out".to_owned())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(AppError::Conflict("related rows".to_owned())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AppError::InvalidModule("khong-co".to_owned())).status(),
            StatusCode::NOT_FOUND
        );
    }
}
