//! Risk endpoints: live assessment of a tracked position and the pre-trade simulator.

use crate::api::AppState;
use crate::domain::{Asset, Decimal, Direction, HealthReading, PositionId, RiskAssessment};
use crate::engine::TradeTicket;
use crate::error::AppError;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRiskResponse {
    pub position_id: u64,
    pub health: Option<HealthReading>,
    pub assessment: RiskAssessment,
}

pub async fn get_position_risk(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<PositionRiskResponse>, AppError> {
    let position_id = PositionId::new(id);
    let view = state.monitor.position(position_id).await?;

    let assessment = match view.assessment {
        Some(outcome) => outcome?,
        None => {
            return Err(AppError::Unprocessable(format!(
                "position {} is closed",
                position_id
            )))
        }
    };

    Ok(Json(PositionRiskResponse {
        position_id: id,
        health: view.health,
        assessment,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub asset: String,
    pub direction: String,
    pub collateral: Decimal,
    pub leverage: Decimal,
    pub entry_price: Decimal,
    pub current_price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub ticket: TradeTicket,
    pub current_price: Decimal,
    pub assessment: RiskAssessment,
}

pub async fn simulate(
    State(state): State<AppState>,
    Json(body): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, AppError> {
    let asset = Asset::parse(&body.asset)
        .map_err(|_| AppError::BadRequest("Invalid asset".into()))?;
    let direction: Direction = body
        .direction
        .parse()
        .map_err(|_| AppError::BadRequest("direction must be long or short".into()))?;

    let ticket = TradeTicket {
        asset,
        direction,
        collateral: body.collateral,
        leverage: body.leverage,
        entry_price: body.entry_price,
    };
    let assessment = state.monitor.simulate(&ticket, body.current_price)?;

    Ok(Json(SimulateResponse {
        ticket,
        current_price: body.current_price,
        assessment,
    }))
}
