//! Risk tier threshold table.

use super::RiskError;
use crate::domain::{Decimal, RiskTier};
use serde::Serialize;

/// Distance-to-liquidation thresholds, in percent.
///
/// Each bound is exclusive from below: a distance strictly greater than
/// `safe_above` is Safe, strictly greater than `warning_above` is Warning,
/// strictly greater than `critical_above` is Critical, anything else is
/// ImmediateRisk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierTable {
    safe_above: Decimal,
    warning_above: Decimal,
    critical_above: Decimal,
}

impl TierTable {
    /// Bounds must be non-negative and strictly descending.
    pub fn new(
        safe_above: Decimal,
        warning_above: Decimal,
        critical_above: Decimal,
    ) -> Result<Self, RiskError> {
        if critical_above.is_negative() {
            return Err(RiskError::invalid("tier thresholds must be non-negative"));
        }
        if !(safe_above > warning_above && warning_above > critical_above) {
            return Err(RiskError::invalid(format!(
                "tier thresholds must be strictly descending, got {} / {} / {}",
                safe_above, warning_above, critical_above
            )));
        }
        Ok(Self {
            safe_above,
            warning_above,
            critical_above,
        })
    }

    pub fn classify(&self, distance_pct: Decimal) -> RiskTier {
        if distance_pct > self.safe_above {
            RiskTier::Safe
        } else if distance_pct > self.warning_above {
            RiskTier::Warning
        } else if distance_pct > self.critical_above {
            RiskTier::Critical
        } else {
            RiskTier::ImmediateRisk
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            safe_above: Decimal::from(20i64),
            warning_above: Decimal::from(10i64),
            critical_above: Decimal::from(5i64),
        }
    }
}
