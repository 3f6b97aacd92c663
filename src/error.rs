use crate::engine::RiskError;
use crate::feed::FeedError;
use crate::orchestration::MonitorError;
use crate::session::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
}

impl From<RiskError> for AppError {
    fn from(err: RiskError) -> Self {
        AppError::Unprocessable(err.to_string())
    }
}

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::NoSession => AppError::Conflict(err.to_string()),
            MonitorError::Feed(FeedError::Decode { .. }) => AppError::BadRequest(err.to_string()),
            MonitorError::Feed(FeedError::Source(_)) => AppError::Internal(err.to_string()),
            MonitorError::Session(SessionError::UnknownPosition(_)) => {
                AppError::NotFound(err.to_string())
            }
            MonitorError::Session(SessionError::InvalidUpdate(_)) => {
                AppError::BadRequest(err.to_string())
            }
            MonitorError::Session(_) => AppError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PositionId;

    #[test]
    fn test_monitor_error_status_mapping() {
        let cases = [
            (MonitorError::NoSession, StatusCode::CONFLICT),
            (
                MonitorError::Feed(FeedError::Decode {
                    field: "price",
                    reason: "bad".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                MonitorError::Session(SessionError::UnknownPosition(PositionId::new(1))),
                StatusCode::NOT_FOUND,
            ),
            (
                MonitorError::Session(SessionError::PositionClosed(PositionId::new(1))),
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_risk_error_is_unprocessable() {
        let err = AppError::from(RiskError::InvalidInput("leverage".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
