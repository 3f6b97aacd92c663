use crate::domain::{Asset, MarketSnapshot};
use std::collections::BTreeMap;

/// Outcome of offering a new observation to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Applied,
    /// Not newer than the retained snapshot; ignored.
    Stale,
}

/// One current snapshot per asset, last-write-wins by `observed_at`.
#[derive(Debug, Clone, Default)]
pub struct MarketBook {
    snapshots: BTreeMap<Asset, MarketSnapshot>,
}

impl MarketBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, snapshot: MarketSnapshot) -> Observation {
        match self.snapshots.get(&snapshot.asset) {
            Some(current) if !snapshot.supersedes(current) => Observation::Stale,
            _ => {
                self.snapshots.insert(snapshot.asset.clone(), snapshot);
                Observation::Applied
            }
        }
    }

    pub fn current(&self, asset: &Asset) -> Option<&MarketSnapshot> {
        self.snapshots.get(asset)
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &MarketSnapshot> {
        self.snapshots.values()
    }
}
