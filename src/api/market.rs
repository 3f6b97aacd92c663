use crate::api::AppState;
use crate::domain::MarketSnapshot;
use crate::error::AppError;
use crate::session::Alert;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    pub snapshots: Vec<MarketSnapshot>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

pub async fn get_market(State(state): State<AppState>) -> Result<Json<MarketResponse>, AppError> {
    let snapshots = state.monitor.market().await?;
    Ok(Json(MarketResponse { snapshots }))
}

pub async fn get_alerts(State(state): State<AppState>) -> Result<Json<AlertsResponse>, AppError> {
    let alerts = state.monitor.alerts().await?;
    Ok(Json(AlertsResponse { alerts }))
}
