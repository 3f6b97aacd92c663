use crate::domain::{Asset, Decimal, Sequence};
use serde::{Deserialize, Serialize};

/// Latest known price for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub asset: Asset,
    pub price: Decimal,
    pub observed_at: Sequence,
}

impl MarketSnapshot {
    pub fn new(asset: Asset, price: Decimal, observed_at: Sequence) -> Self {
        MarketSnapshot {
            asset,
            price,
            observed_at,
        }
    }

    /// True if this observation should replace `current`.
    pub fn supersedes(&self, current: &MarketSnapshot) -> bool {
        self.asset == current.asset && self.observed_at > current.observed_at
    }
}
