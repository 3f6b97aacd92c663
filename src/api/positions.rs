use crate::api::AppState;
use crate::domain::{HealthReading, Position, RiskAssessment};
use crate::error::AppError;
use crate::orchestration::PositionView;
use crate::session::Alert;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub positions: Vec<PositionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub position: Position,
    pub health: Option<HealthReading>,
    pub alert: Option<Alert>,
    /// Null when no assessment is available; `error` then says why.
    pub assessment: Option<RiskAssessment>,
    pub error: Option<String>,
}

impl From<PositionView> for PositionDto {
    fn from(view: PositionView) -> Self {
        let (assessment, error) = match view.assessment {
            Some(Ok(a)) => (Some(a), None),
            Some(Err(e)) => (None, Some(e.to_string())),
            None => (None, Some(format!("position {} is closed", view.position.id))),
        };
        Self {
            position: view.position,
            health: view.health,
            alert: view.alert,
            assessment,
            error,
        }
    }
}

pub async fn get_positions(
    State(state): State<AppState>,
) -> Result<Json<PositionsResponse>, AppError> {
    let positions = state
        .monitor
        .positions()
        .await?
        .into_iter()
        .map(PositionDto::from)
        .collect();
    Ok(Json(PositionsResponse { positions }))
}
