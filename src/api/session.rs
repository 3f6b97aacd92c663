use crate::api::AppState;
use crate::domain::Owner;
use crate::error::AppError;
use crate::orchestration::SessionInfo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub owner: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub owner: String,
    pub connected_at: String,
}

impl From<SessionInfo> for SessionResponse {
    fn from(info: SessionInfo) -> Self {
        Self {
            session_id: info.id.to_string(),
            owner: info.owner.to_string(),
            connected_at: info.connected_at.to_rfc3339(),
        }
    }
}

pub async fn connect(
    State(state): State<AppState>,
    Json(body): Json<ConnectRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let owner = Owner::parse(&body.owner)
        .map_err(|_| AppError::BadRequest("Invalid owner address".into()))?;
    let info = state.monitor.connect(owner).await;
    Ok(Json(info.into()))
}

pub async fn get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    state
        .monitor
        .session_info()
        .await
        .map(|info| Json(info.into()))
        .ok_or_else(|| AppError::Conflict("no active session".into()))
}

/// Discard the session. Idempotent.
pub async fn disconnect(State(state): State<AppState>) -> StatusCode {
    state.monitor.disconnect().await;
    StatusCode::NO_CONTENT
}
