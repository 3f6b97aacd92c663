pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod feed;
pub mod orchestration;
pub mod session;

pub use config::Config;
pub use domain::{
    Asset, Decimal, Direction, HealthReading, MarketSnapshot, Owner, Position, PositionId,
    PositionState, RiskAssessment, RiskTier, Sequence,
};
pub use engine::{RiskEngine, RiskError, TierTable, TradeTicket};
pub use error::AppError;
pub use feed::{EventSource, FeedError, FixedPointCodec, MockEventSource, RawFeedEvent};
pub use orchestration::{Monitor, MonitorError};
