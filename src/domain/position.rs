//! Leveraged position as reported by the ledger.

use crate::domain::{Asset, Decimal, Direction, Owner, PositionId};
use serde::{Deserialize, Serialize};

/// Lifecycle state. Open transitions to Closed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    #[default]
    Open,
    Closed,
}

/// A leveraged exposure opened by an account on one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub owner: Owner,
    pub asset: Asset,
    pub direction: Direction,
    /// Posted collateral; changes only through ledger updates.
    pub collateral: Decimal,
    pub leverage: Decimal,
    /// `None` while the open is awaiting confirmation.
    pub entry_price: Option<Decimal>,
    pub health_factor: Decimal,
    pub state: PositionState,
}

impl Position {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PositionId,
        owner: Owner,
        asset: Asset,
        direction: Direction,
        collateral: Decimal,
        leverage: Decimal,
        entry_price: Option<Decimal>,
        health_factor: Decimal,
    ) -> Self {
        Position {
            id,
            owner,
            asset,
            direction,
            collateral,
            leverage,
            entry_price,
            health_factor,
            state: PositionState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == PositionState::Open
    }
}
