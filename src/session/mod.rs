//! Session-scoped state for one connected account.
//!
//! A session owns every position, snapshot and alert it has seen. Nothing here
//! outlives the session: on disconnect the whole value is dropped and the data
//! is re-derived from the chain on reconnect.

use crate::domain::{Decimal, Owner, PositionId};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod alerts;
pub mod market;
pub mod positions;

pub use alerts::{Alert, AlertBook};
pub use market::{MarketBook, Observation};
pub use positions::PositionBook;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("position {0} is already tracked")]
    DuplicatePosition(PositionId),
    #[error("position {0} is not tracked by this session")]
    UnknownPosition(PositionId),
    #[error("position {0} is closed")]
    PositionClosed(PositionId),
    #[error("entry price for position {id} is already set to {existing}")]
    EntryAlreadySet { id: PositionId, existing: Decimal },
    #[error("invalid update: {0}")]
    InvalidUpdate(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    owner: Owner,
    connected_at: DateTime<Utc>,
    pub positions: PositionBook,
    pub market: MarketBook,
    pub alerts: AlertBook,
}

impl Session {
    pub fn new(owner: Owner) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            connected_at: Utc::now(),
            positions: PositionBook::new(),
            market: MarketBook::new(),
            alerts: AlertBook::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Case-insensitive owner check used to drop other accounts' events.
    pub fn owns(&self, owner: &Owner) -> bool {
        &self.owner == owner
    }
}
