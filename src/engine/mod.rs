//! Pure computation engine for position risk.
//!
//! Every function here is a total function of its explicit arguments: no I/O,
//! no clocks, no interior mutability. Callers may invoke it from any number of
//! tasks without synchronization.

use crate::domain::Asset;
use thiserror::Error;

pub mod health;
pub mod risk;
pub mod simulator;
pub mod tiers;

pub use health::interpret_health_factor;
pub use risk::{
    classify_risk_tier, compute_distance_to_liquidation, compute_exposure,
    compute_liquidation_price, compute_pnl, RiskEngine,
};
pub use simulator::TradeTicket;
pub use tiers::TierTable;

/// Rejected engine call. Never retryable: the caller must fix the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("asset mismatch: position is {position}, market snapshot is {market}")]
    AssetMismatch { position: Asset, market: Asset },
}

impl RiskError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RiskError::InvalidInput(msg.into())
    }

    pub(crate) fn overflow(op: &str) -> Self {
        RiskError::InvalidInput(format!("arithmetic overflow computing {}", op))
    }
}
