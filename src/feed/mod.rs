//! Chain event feed: raw contract events, fixed-point decoding and the source
//! abstraction the transport layer plugs into.

use crate::domain::{Asset, Decimal, MarketSnapshot, Owner, Position, PositionId, RiskTier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod codec;
pub mod mock;

pub use codec::FixedPointCodec;
pub use mock::MockEventSource;

/// Contract event as delivered by the transport.
///
/// Integer amounts are fixed-point and carried as decimal strings so that
/// uint256 values survive JSON without precision loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawFeedEvent {
    /// Oracle `PriceUpdate`.
    #[serde(rename_all = "camelCase")]
    PriceUpdate {
        asset: String,
        price: String,
        sequence: u64,
    },
    /// Leverage manager position read-back after `openPosition`.
    #[serde(rename_all = "camelCase")]
    PositionOpened {
        position_id: u64,
        owner: String,
        asset: String,
        direction: u8,
        collateral: String,
        leverage: String,
        #[serde(default)]
        entry_price: Option<String>,
        health_factor: String,
    },
    /// Leverage manager `PositionUpdate`.
    #[serde(rename_all = "camelCase")]
    PositionUpdate {
        position_id: u64,
        owner: String,
        collateral: String,
        health_factor: String,
    },
    #[serde(rename_all = "camelCase")]
    EntryConfirmed { position_id: u64, entry_price: String },
    #[serde(rename_all = "camelCase")]
    PositionClosed { position_id: u64 },
    /// Guardian `RiskThresholdBreach`.
    #[serde(rename_all = "camelCase")]
    RiskThresholdBreach { position_id: u64, risk_level: u8 },
}

/// Decoded, typed feed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Price(MarketSnapshot),
    Opened(Position),
    Updated {
        position_id: PositionId,
        owner: Owner,
        collateral: Decimal,
        health_factor: Decimal,
    },
    EntryConfirmed {
        position_id: PositionId,
        entry_price: Decimal,
    },
    Closed {
        position_id: PositionId,
    },
    RiskBreach {
        position_id: PositionId,
        tier: RiskTier,
    },
}

impl FeedEvent {
    /// Owner carried by the event, if the contract emits one.
    pub fn owner(&self) -> Option<&Owner> {
        match self {
            FeedEvent::Opened(position) => Some(&position.owner),
            FeedEvent::Updated { owner, .. } => Some(owner),
            _ => None,
        }
    }

    /// Asset carried by the event, if any.
    pub fn asset(&self) -> Option<&Asset> {
        match self {
            FeedEvent::Price(snapshot) => Some(&snapshot.asset),
            FeedEvent::Opened(position) => Some(&position.asset),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeedEvent::Price(_) => "price_update",
            FeedEvent::Opened(_) => "position_opened",
            FeedEvent::Updated { .. } => "position_update",
            FeedEvent::EntryConfirmed { .. } => "entry_confirmed",
            FeedEvent::Closed { .. } => "position_closed",
            FeedEvent::RiskBreach { .. } => "risk_threshold_breach",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("cannot decode {field}: {reason}")]
    Decode { field: &'static str, reason: String },
    #[error("event source error: {0}")]
    Source(String),
}

impl FeedError {
    pub(crate) fn decode(field: &'static str, reason: impl Into<String>) -> Self {
        FeedError::Decode {
            field,
            reason: reason.into(),
        }
    }
}

/// Source of already-delivered chain events.
///
/// Implementations own the transport (subscriptions, reconnects, teardown);
/// this crate only drains what they have received.
#[async_trait]
pub trait EventSource: Send + Sync + fmt::Debug {
    /// Return the events received since the previous poll, oldest first.
    async fn poll_events(&self) -> Result<Vec<RawFeedEvent>, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_json_shape() {
        let raw: RawFeedEvent = serde_json::from_str(
            r#"{"type":"PriceUpdate","asset":"ETH","price":"300000000000","sequence":7}"#,
        )
        .unwrap();
        assert_eq!(
            raw,
            RawFeedEvent::PriceUpdate {
                asset: "ETH".to_string(),
                price: "300000000000".to_string(),
                sequence: 7,
            }
        );

        let raw: RawFeedEvent = serde_json::from_str(
            r#"{"type":"RiskThresholdBreach","positionId":3,"riskLevel":2}"#,
        )
        .unwrap();
        assert_eq!(
            raw,
            RawFeedEvent::RiskThresholdBreach {
                position_id: 3,
                risk_level: 2
            }
        );
    }

    #[test]
    fn test_opened_entry_price_is_optional() {
        let raw: RawFeedEvent = serde_json::from_str(
            r#"{"type":"PositionOpened","positionId":1,"owner":"0x00000000000000000000000000000000000000aa",
               "asset":"ETH","direction":0,"collateral":"100000000000","leverage":"3",
               "healthFactor":"1000000000000000000"}"#,
        )
        .unwrap();
        assert!(matches!(
            raw,
            RawFeedEvent::PositionOpened {
                entry_price: None,
                ..
            }
        ));
    }

    #[test]
    fn test_feed_error_display() {
        let err = FeedError::decode("price", "not an integer");
        assert_eq!(err.to_string(), "cannot decode price: not an integer");
        assert_eq!(
            FeedError::Source("closed".to_string()).to_string(),
            "event source error: closed"
        );
    }
}
