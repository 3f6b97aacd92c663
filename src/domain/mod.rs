//! Domain types for the position risk service.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: Sequence, PositionId, Owner, Asset, Direction
//! - Position and MarketSnapshot inputs
//! - RiskAssessment, RiskTier and HealthReading outputs

pub mod assessment;
pub mod decimal;
pub mod market;
pub mod position;
pub mod primitives;

pub use assessment::{HealthReading, RiskAssessment, RiskTier};
pub use decimal::Decimal;
pub use market::MarketSnapshot;
pub use position::{Position, PositionState};
pub use primitives::{Asset, Direction, Owner, PositionId, PrimitiveParseError, Sequence};
