use super::RiskError;
use crate::domain::{Decimal, HealthReading};

/// Interpret a ledger health factor for display and alerting.
///
/// The ledger may push values at or below zero once a position is being
/// liquidated; the percentage is clamped at zero but `factor` is kept as
/// reported.
pub fn interpret_health_factor(factor: Decimal) -> Result<HealthReading, RiskError> {
    let percent = factor
        .checked_mul(Decimal::hundred())
        .ok_or_else(|| RiskError::overflow("health percentage"))?
        .max(Decimal::zero());

    Ok(HealthReading {
        factor,
        percent,
        liquidatable: !factor.is_positive(),
    })
}
