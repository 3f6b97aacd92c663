//! Feed ingestion endpoint: the chain transport pushes raw contract events here.

use crate::api::AppState;
use crate::domain::{HealthReading, RiskAssessment};
use crate::error::AppError;
use crate::feed::RawFeedEvent;
use crate::orchestration::{ApplyOutcome, AssessmentUpdate, IgnoreReason};
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub updates: Vec<UpdateDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDto {
    pub position_id: u64,
    pub asset: String,
    pub health: Option<HealthReading>,
    pub assessment: Option<RiskAssessment>,
    pub error: Option<String>,
}

impl From<AssessmentUpdate> for UpdateDto {
    fn from(update: AssessmentUpdate) -> Self {
        let (assessment, error) = match update.outcome {
            Ok(a) => (Some(a), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            position_id: update.position_id.as_u64(),
            asset: update.asset.to_string(),
            health: update.health,
            assessment,
            error,
        }
    }
}

fn reason_str(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::ForeignOwner => "foreign_owner",
        IgnoreReason::UnwatchedAsset => "unwatched_asset",
        IgnoreReason::StalePrice => "stale_price",
        IgnoreReason::UnknownPosition => "unknown_position",
        IgnoreReason::PositionClosed => "position_closed",
    }
}

pub async fn post_event(
    State(state): State<AppState>,
    Json(raw): Json<RawFeedEvent>,
) -> Result<Json<EventResponse>, AppError> {
    let response = match state.monitor.apply(&raw).await? {
        ApplyOutcome::Applied(updates) => EventResponse {
            status: "applied",
            reason: None,
            updates: updates.into_iter().map(UpdateDto::from).collect(),
        },
        ApplyOutcome::Ignored(reason) => EventResponse {
            status: "ignored",
            reason: Some(reason_str(reason)),
            updates: Vec::new(),
        },
    };
    Ok(Json(response))
}
