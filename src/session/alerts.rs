use crate::domain::{PositionId, RiskTier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Latest guardian breach reported for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub position_id: PositionId,
    pub tier: RiskTier,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertBook {
    alerts: BTreeMap<PositionId, Alert>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous alert for the position.
    pub fn record(&mut self, position_id: PositionId, tier: RiskTier, received_at: DateTime<Utc>) {
        self.alerts.insert(
            position_id,
            Alert {
                position_id,
                tier,
                received_at,
            },
        );
    }

    pub fn get(&self, position_id: PositionId) -> Option<&Alert> {
        self.alerts.get(&position_id)
    }

    pub fn clear(&mut self, position_id: PositionId) -> Option<Alert> {
        self.alerts.remove(&position_id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_alert_wins() {
        let mut book = AlertBook::new();
        let id = PositionId::new(3);
        book.record(id, RiskTier::Warning, Utc::now());
        book.record(id, RiskTier::Critical, Utc::now());

        assert_eq!(book.get(id).unwrap().tier, RiskTier::Critical);
        assert_eq!(book.list().count(), 1);
        assert!(book.clear(id).is_some());
        assert!(book.get(id).is_none());
    }
}
