//! Pre-trade inputs for the simulator.

use crate::domain::{Asset, Decimal, Direction};
use serde::{Deserialize, Serialize};

/// Parameters of a trade the account is considering but has not opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeTicket {
    pub asset: Asset,
    pub direction: Direction,
    pub collateral: Decimal,
    pub leverage: Decimal,
    pub entry_price: Decimal,
}
