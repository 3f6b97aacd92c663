//! Fixed-point decoding of raw contract events.

use super::{FeedError, FeedEvent, RawFeedEvent};
use crate::domain::{
    Asset, Decimal, Direction, MarketSnapshot, Owner, Position, PositionId, RiskTier, Sequence,
};

const MAX_DECIMALS: u32 = 28;

/// Scales used by the deployed contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointCodec {
    price_decimals: u32,
    amount_decimals: u32,
    health_decimals: u32,
}

impl FixedPointCodec {
    pub fn new(
        price_decimals: u32,
        amount_decimals: u32,
        health_decimals: u32,
    ) -> Result<Self, FeedError> {
        for (field, decimals) in [
            ("price_decimals", price_decimals),
            ("amount_decimals", amount_decimals),
            ("health_decimals", health_decimals),
        ] {
            if decimals > MAX_DECIMALS {
                return Err(FeedError::decode(
                    field,
                    format!("{} exceeds the maximum of {}", decimals, MAX_DECIMALS),
                ));
            }
        }
        Ok(Self {
            price_decimals,
            amount_decimals,
            health_decimals,
        })
    }

    pub fn decode(&self, raw: &RawFeedEvent) -> Result<FeedEvent, FeedError> {
        match raw {
            RawFeedEvent::PriceUpdate {
                asset,
                price,
                sequence,
            } => {
                let price = self.positive(price, self.price_decimals, "price")?;
                Ok(FeedEvent::Price(MarketSnapshot::new(
                    parse_asset(asset)?,
                    price,
                    Sequence::new(*sequence),
                )))
            }
            RawFeedEvent::PositionOpened {
                position_id,
                owner,
                asset,
                direction,
                collateral,
                leverage,
                entry_price,
                health_factor,
            } => {
                let direction = Direction::from_index(*direction).ok_or_else(|| {
                    FeedError::decode("direction", format!("unknown index {}", direction))
                })?;
                let leverage = fixed(leverage, 0, "leverage")?;
                if leverage < Decimal::one() {
                    return Err(FeedError::decode(
                        "leverage",
                        format!("must be at least 1, got {}", leverage),
                    ));
                }
                // The ledger reports 0 until the open is confirmed.
                let entry_price = match entry_price {
                    Some(raw) => Some(fixed(raw, self.price_decimals, "entry_price")?)
                        .filter(|p| p.is_positive()),
                    None => None,
                };

                Ok(FeedEvent::Opened(Position::new(
                    PositionId::new(*position_id),
                    parse_owner(owner)?,
                    parse_asset(asset)?,
                    direction,
                    fixed(collateral, self.amount_decimals, "collateral")?,
                    leverage,
                    entry_price,
                    fixed(health_factor, self.health_decimals, "health_factor")?,
                )))
            }
            RawFeedEvent::PositionUpdate {
                position_id,
                owner,
                collateral,
                health_factor,
            } => Ok(FeedEvent::Updated {
                position_id: PositionId::new(*position_id),
                owner: parse_owner(owner)?,
                collateral: fixed(collateral, self.amount_decimals, "collateral")?,
                health_factor: fixed(health_factor, self.health_decimals, "health_factor")?,
            }),
            RawFeedEvent::EntryConfirmed {
                position_id,
                entry_price,
            } => Ok(FeedEvent::EntryConfirmed {
                position_id: PositionId::new(*position_id),
                entry_price: self.positive(entry_price, self.price_decimals, "entry_price")?,
            }),
            RawFeedEvent::PositionClosed { position_id } => Ok(FeedEvent::Closed {
                position_id: PositionId::new(*position_id),
            }),
            RawFeedEvent::RiskThresholdBreach {
                position_id,
                risk_level,
            } => {
                let tier = RiskTier::from_level(*risk_level).ok_or_else(|| {
                    FeedError::decode("risk_level", format!("unknown level {}", risk_level))
                })?;
                Ok(FeedEvent::RiskBreach {
                    position_id: PositionId::new(*position_id),
                    tier,
                })
            }
        }
    }

    fn positive(
        &self,
        raw: &str,
        decimals: u32,
        field: &'static str,
    ) -> Result<Decimal, FeedError> {
        let value = fixed(raw, decimals, field)?;
        if !value.is_positive() {
            return Err(FeedError::decode(field, "must be positive"));
        }
        Ok(value)
    }
}

impl Default for FixedPointCodec {
    fn default() -> Self {
        Self {
            price_decimals: 8,
            amount_decimals: 8,
            health_decimals: 18,
        }
    }
}

fn fixed(raw: &str, decimals: u32, field: &'static str) -> Result<Decimal, FeedError> {
    let integer = raw
        .trim()
        .parse::<u128>()
        .map_err(|e| FeedError::decode(field, format!("{:?} is not an unsigned integer: {}", raw, e)))?;
    Decimal::from_fixed_point(integer, decimals)
        .ok_or_else(|| FeedError::decode(field, format!("{} is out of range", raw)))
}

fn parse_owner(raw: &str) -> Result<Owner, FeedError> {
    Owner::parse(raw).map_err(|e| FeedError::decode("owner", e.to_string()))
}

fn parse_asset(raw: &str) -> Result<Asset, FeedError> {
    Asset::parse(raw).map_err(|e| FeedError::decode("asset", e.to_string()))
}
