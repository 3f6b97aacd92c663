//! Engine outputs: risk tier, risk assessment and health reading.
//!
//! None of these are stored as ground truth; they are recomputed whenever the
//! position or the market snapshot behind them changes.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Discrete severity classification, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Safe,
    Warning,
    Critical,
    ImmediateRisk,
}

impl RiskTier {
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Safe,
        RiskTier::Warning,
        RiskTier::Critical,
        RiskTier::ImmediateRisk,
    ];

    /// Decode the guardian contract's `RiskLevel` enum index.
    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(level as usize).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Safe => "Safe",
            RiskTier::Warning => "Warning",
            RiskTier::Critical => "Critical",
            RiskTier::ImmediateRisk => "Immediate Risk",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived risk figures for one position at one market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// `collateral * leverage`, in quote currency.
    pub exposure: Decimal,
    pub liquidation_price: Decimal,
    /// Signed unrealized P&L in quote currency.
    pub pnl: Decimal,
    /// Non-negative; 0 means at or through liquidation.
    pub distance_to_liquidation_pct: Decimal,
    pub risk_tier: RiskTier,
}

/// Display-ready interpretation of a ledger health factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReading {
    pub factor: Decimal,
    /// `factor * 100`, clamped at zero.
    pub percent: Decimal,
    pub liquidatable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_is_severity() {
        assert!(RiskTier::Safe < RiskTier::Warning);
        assert!(RiskTier::Warning < RiskTier::Critical);
        assert!(RiskTier::Critical < RiskTier::ImmediateRisk);
    }

    #[test]
    fn test_tier_from_guardian_level() {
        assert_eq!(RiskTier::from_level(0), Some(RiskTier::Safe));
        assert_eq!(RiskTier::from_level(2), Some(RiskTier::Critical));
        assert_eq!(RiskTier::from_level(3), Some(RiskTier::ImmediateRisk));
        assert_eq!(RiskTier::from_level(4), None);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(RiskTier::ImmediateRisk.to_string(), "Immediate Risk");
        assert_eq!(RiskTier::Safe.label(), "Safe");
    }
}
