use crate::api::AppState;
use axum::extract::State;
use axum::Json;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the process is up; reports whether an account session is live.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let session = state.monitor.session_info().await.is_some();
    Json(serde_json::json!({
        "status": "ready",
        "session": session,
        "watchedAssets": state.config.watched_assets,
    }))
}
