//! Canonical liquidation, P&L and distance formulas.
//!
//! Simplified margin model: no funding, no fees, no maintenance margin. A
//! position is liquidated once the adverse move equals `1 / leverage` of the
//! entry price.

use super::simulator::TradeTicket;
use super::tiers::TierTable;
use super::RiskError;
use crate::domain::{Decimal, Direction, MarketSnapshot, Position, RiskAssessment, RiskTier};

/// Exposure size in quote currency: `collateral * leverage`.
pub fn compute_exposure(collateral: Decimal, leverage: Decimal) -> Result<Decimal, RiskError> {
    ensure_collateral(collateral)?;
    ensure_leverage(leverage)?;
    collateral
        .checked_mul(leverage)
        .ok_or_else(|| RiskError::overflow("exposure"))
}

/// Long: `entry * (leverage - 1) / leverage`. Short: `entry * (leverage + 1) / leverage`.
pub fn compute_liquidation_price(
    entry_price: Decimal,
    leverage: Decimal,
    direction: Direction,
) -> Result<Decimal, RiskError> {
    ensure_price("entry price", entry_price)?;
    ensure_leverage(leverage)?;

    let factor = match direction {
        Direction::Long => leverage.checked_sub(Decimal::one()),
        Direction::Short => leverage.checked_add(Decimal::one()),
    }
    .ok_or_else(|| RiskError::overflow("liquidation price"))?;

    entry_price
        .checked_mul(factor)
        .and_then(|scaled| scaled.checked_div(leverage))
        .ok_or_else(|| RiskError::overflow("liquidation price"))
}

/// Signed P&L of `position` at `current_price`.
///
/// Returns zero while the position's entry price is still unconfirmed.
pub fn compute_pnl(position: &Position, current_price: Decimal) -> Result<Decimal, RiskError> {
    ensure_price("current price", current_price)?;
    match position.entry_price {
        None => Ok(Decimal::zero()),
        Some(entry_price) => pnl_at(
            position.direction,
            position.collateral,
            position.leverage,
            entry_price,
            current_price,
        ),
    }
}

/// `|current - liquidation| / current * 100`.
///
/// The absolute form lets Long and Short positions share one threshold table.
pub fn compute_distance_to_liquidation(
    current_price: Decimal,
    liquidation_price: Decimal,
) -> Result<Decimal, RiskError> {
    ensure_price("current price", current_price)?;
    if liquidation_price.is_negative() {
        return Err(RiskError::invalid(format!(
            "liquidation price must be non-negative, got {}",
            liquidation_price
        )));
    }

    current_price
        .checked_sub(liquidation_price)
        .map(|gap| gap.abs())
        .and_then(|gap| gap.checked_mul(Decimal::hundred()))
        .and_then(|scaled| scaled.checked_div(current_price))
        .ok_or_else(|| RiskError::overflow("distance to liquidation"))
}

/// Classify with the default threshold table.
pub fn classify_risk_tier(distance_pct: Decimal) -> RiskTier {
    TierTable::default().classify(distance_pct)
}

fn pnl_at(
    direction: Direction,
    collateral: Decimal,
    leverage: Decimal,
    entry_price: Decimal,
    current_price: Decimal,
) -> Result<Decimal, RiskError> {
    ensure_price("entry price", entry_price)?;
    let exposure = compute_exposure(collateral, leverage)?;

    let move_in_favor = match direction {
        Direction::Long => current_price.checked_sub(entry_price),
        Direction::Short => entry_price.checked_sub(current_price),
    }
    .ok_or_else(|| RiskError::overflow("pnl"))?;

    // (move * collateral * leverage) / entry == move * size, with size in units of the asset.
    move_in_favor
        .checked_mul(exposure)
        .and_then(|notional| notional.checked_div(entry_price))
        .ok_or_else(|| RiskError::overflow("pnl"))
}

fn ensure_price(what: &str, price: Decimal) -> Result<(), RiskError> {
    if !price.is_positive() {
        return Err(RiskError::invalid(format!(
            "{} must be positive, got {}",
            what, price
        )));
    }
    Ok(())
}

fn ensure_leverage(leverage: Decimal) -> Result<(), RiskError> {
    if leverage < Decimal::one() {
        return Err(RiskError::invalid(format!(
            "leverage must be at least 1, got {}",
            leverage
        )));
    }
    Ok(())
}

fn ensure_collateral(collateral: Decimal) -> Result<(), RiskError> {
    if collateral.is_negative() {
        return Err(RiskError::invalid(format!(
            "collateral must be non-negative, got {}",
            collateral
        )));
    }
    Ok(())
}

/// Composes the formulas above under one threshold table.
///
/// The live monitor (`evaluate`) and the pre-trade simulator (`simulate`) share
/// a single code path so they can never classify the same inputs differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskEngine {
    tiers: TierTable,
}

impl RiskEngine {
    pub fn new(tiers: TierTable) -> Self {
        Self { tiers }
    }

    /// Assess a live position against the current snapshot of its asset.
    pub fn evaluate(
        &self,
        position: &Position,
        snapshot: &MarketSnapshot,
    ) -> Result<RiskAssessment, RiskError> {
        if position.asset != snapshot.asset {
            return Err(RiskError::AssetMismatch {
                position: position.asset.clone(),
                market: snapshot.asset.clone(),
            });
        }
        let entry_price = position.entry_price.ok_or_else(|| {
            RiskError::invalid(format!(
                "entry price for position {} is not confirmed yet",
                position.id
            ))
        })?;

        self.assess(
            position.direction,
            position.collateral,
            position.leverage,
            entry_price,
            snapshot.price,
        )
    }

    /// Assess a trade that has not been opened yet.
    pub fn simulate(
        &self,
        ticket: &TradeTicket,
        current_price: Decimal,
    ) -> Result<RiskAssessment, RiskError> {
        self.assess(
            ticket.direction,
            ticket.collateral,
            ticket.leverage,
            ticket.entry_price,
            current_price,
        )
    }

    fn assess(
        &self,
        direction: Direction,
        collateral: Decimal,
        leverage: Decimal,
        entry_price: Decimal,
        current_price: Decimal,
    ) -> Result<RiskAssessment, RiskError> {
        let exposure = compute_exposure(collateral, leverage)?;
        let liquidation_price = compute_liquidation_price(entry_price, leverage, direction)?;
        let pnl = pnl_at(direction, collateral, leverage, entry_price, current_price)?;
        let distance = compute_distance_to_liquidation(current_price, liquidation_price)?;
        let crossed = match direction {
            Direction::Long => current_price <= liquidation_price,
            Direction::Short => current_price >= liquidation_price,
        };
        // At or through liquidation there is no distance left.
        let distance_to_liquidation_pct = if crossed { Decimal::zero() } else { distance };

        Ok(RiskAssessment {
            exposure,
            liquidation_price,
            pnl,
            distance_to_liquidation_pct,
            risk_tier: self.tiers.classify(distance_to_liquidation_pct),
        })
    }
}
