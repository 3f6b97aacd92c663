//! Live risk monitor: applies feed events to the active session and
//! re-evaluates every position they touch.

use crate::config::Config;
use crate::domain::{
    Asset, Decimal, HealthReading, MarketSnapshot, Owner, Position, PositionId, RiskAssessment,
    RiskTier,
};
use crate::engine::{interpret_health_factor, RiskEngine, RiskError, TradeTicket};
use crate::feed::{EventSource, FeedError, FeedEvent, FixedPointCodec, RawFeedEvent};
use crate::session::{Alert, Observation, Session, SessionError};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Freshly computed assessment for one position, published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentUpdate {
    pub position_id: PositionId,
    pub asset: Asset,
    pub health: Option<HealthReading>,
    /// An error here means "no assessment available", never a partial figure.
    pub outcome: Result<RiskAssessment, RiskError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    ForeignOwner,
    UnwatchedAsset,
    StalePrice,
    UnknownPosition,
    /// Guardian breach delivered after the position was closed.
    PositionClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(Vec<AssessmentUpdate>),
    Ignored(IgnoreReason),
}

/// A session position together with everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionView {
    pub position: Position,
    pub health: Option<HealthReading>,
    pub alert: Option<Alert>,
    /// `None` once the position is closed.
    pub assessment: Option<Result<RiskAssessment, RiskError>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: Uuid,
    pub owner: Owner,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("no active session")]
    NoSession,
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct Monitor {
    engine: RiskEngine,
    codec: FixedPointCodec,
    watched_assets: Vec<Asset>,
    session: RwLock<Option<Session>>,
    updates: broadcast::Sender<AssessmentUpdate>,
}

impl Monitor {
    pub fn new(config: &Config) -> Self {
        let (updates, _) = broadcast::channel(config.update_channel_capacity);
        Self {
            engine: RiskEngine::new(config.tiers),
            codec: config.codec,
            watched_assets: config.watched_assets.clone(),
            session: RwLock::new(None),
            updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AssessmentUpdate> {
        self.updates.subscribe()
    }

    /// Start a fresh session for `owner`, discarding any previous one.
    pub async fn connect(&self, owner: Owner) -> SessionInfo {
        let session = Session::new(owner);
        let info = SessionInfo {
            id: session.id(),
            owner: session.owner().clone(),
            connected_at: session.connected_at(),
        };

        let mut guard = self.session.write().await;
        if let Some(previous) = guard.replace(session) {
            tracing::info!(session=%previous.id(), owner=%previous.owner(), "Discarding previous session");
        }
        tracing::info!(session=%info.id, owner=%info.owner, "Session connected");
        info
    }

    /// Drop the active session and everything it holds.
    pub async fn disconnect(&self) -> Option<Uuid> {
        let previous = self.session.write().await.take();
        if let Some(session) = &previous {
            tracing::info!(
                session=%session.id(),
                positions=session.positions.len(),
                "Session disconnected"
            );
        }
        previous.map(|s| s.id())
    }

    pub async fn session_info(&self) -> Option<SessionInfo> {
        self.session.read().await.as_ref().map(|s| SessionInfo {
            id: s.id(),
            owner: s.owner().clone(),
            connected_at: s.connected_at(),
        })
    }

    /// Decode and apply one raw event, publishing the resulting assessments.
    pub async fn apply(&self, raw: &RawFeedEvent) -> Result<ApplyOutcome, MonitorError> {
        let event = self.codec.decode(raw)?;

        let outcome = {
            let mut guard = self.session.write().await;
            let session = guard.as_mut().ok_or(MonitorError::NoSession)?;
            self.apply_event(session, event)?
        };

        if let ApplyOutcome::Applied(updates) = &outcome {
            for update in updates {
                self.publish(update.clone());
            }
        }
        Ok(outcome)
    }

    /// Drain one batch from `source`. Events that fail are logged and skipped.
    ///
    /// Returns the number of events that changed session state.
    pub async fn pump(&self, source: &dyn EventSource) -> Result<usize, MonitorError> {
        let batch = source.poll_events().await?;
        let mut applied = 0;
        for raw in &batch {
            match self.apply(raw).await {
                Ok(ApplyOutcome::Applied(_)) => applied += 1,
                Ok(ApplyOutcome::Ignored(reason)) => {
                    tracing::debug!(?reason, "Feed event ignored");
                }
                Err(MonitorError::NoSession) => return Err(MonitorError::NoSession),
                Err(e) => {
                    tracing::warn!(error=%e, "Skipping feed event");
                }
            }
        }
        Ok(applied)
    }

    pub async fn positions(&self) -> Result<Vec<PositionView>, MonitorError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(MonitorError::NoSession)?;
        Ok(session
            .positions
            .list()
            .map(|p| self.view(session, p))
            .collect())
    }

    pub async fn position(&self, id: PositionId) -> Result<PositionView, MonitorError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(MonitorError::NoSession)?;
        let position = session
            .positions
            .get(id)
            .ok_or(SessionError::UnknownPosition(id))?;
        Ok(self.view(session, position))
    }

    pub async fn market(&self) -> Result<Vec<MarketSnapshot>, MonitorError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(MonitorError::NoSession)?;
        Ok(session.market.snapshots().cloned().collect())
    }

    pub async fn alerts(&self) -> Result<Vec<Alert>, MonitorError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(MonitorError::NoSession)?;
        Ok(session.alerts.list().cloned().collect())
    }

    /// Pre-trade assessment; needs no session.
    pub fn simulate(
        &self,
        ticket: &TradeTicket,
        current_price: Decimal,
    ) -> Result<RiskAssessment, RiskError> {
        self.engine.simulate(ticket, current_price)
    }

    fn apply_event(
        &self,
        session: &mut Session,
        event: FeedEvent,
    ) -> Result<ApplyOutcome, MonitorError> {
        if let Some(owner) = event.owner() {
            if !session.owns(owner) {
                return Ok(ApplyOutcome::Ignored(IgnoreReason::ForeignOwner));
            }
        }
        if let Some(asset) = event.asset() {
            if !self.watched_assets.contains(asset) {
                return Ok(ApplyOutcome::Ignored(IgnoreReason::UnwatchedAsset));
            }
        }

        tracing::debug!(kind = event.kind(), session=%session.id(), "Applying feed event");

        let touched = match event {
            FeedEvent::Price(snapshot) => {
                let asset = snapshot.asset.clone();
                if session.market.observe(snapshot) == Observation::Stale {
                    return Ok(ApplyOutcome::Ignored(IgnoreReason::StalePrice));
                }
                session
                    .positions
                    .open_positions_for(&asset)
                    .map(|p| p.id)
                    .collect::<Vec<_>>()
            }
            FeedEvent::Opened(position) => {
                let id = position.id;
                session.positions.open(position)?;
                tracing::info!(position=%id, "Position opened");
                vec![id]
            }
            FeedEvent::Updated {
                position_id,
                collateral,
                health_factor,
                ..
            } => {
                match session
                    .positions
                    .apply_update(position_id, collateral, health_factor)
                {
                    Err(SessionError::UnknownPosition(_)) => {
                        return Ok(ApplyOutcome::Ignored(IgnoreReason::UnknownPosition))
                    }
                    other => other?,
                };
                vec![position_id]
            }
            FeedEvent::EntryConfirmed {
                position_id,
                entry_price,
            } => {
                match session.positions.confirm_entry(position_id, entry_price) {
                    Err(SessionError::UnknownPosition(_)) => {
                        return Ok(ApplyOutcome::Ignored(IgnoreReason::UnknownPosition))
                    }
                    other => other?,
                };
                vec![position_id]
            }
            FeedEvent::Closed { position_id } => {
                match session.positions.close(position_id) {
                    Err(SessionError::UnknownPosition(_)) => {
                        return Ok(ApplyOutcome::Ignored(IgnoreReason::UnknownPosition))
                    }
                    other => other?,
                };
                session.alerts.clear(position_id);
                tracing::info!(position=%position_id, "Position closed");
                Vec::new()
            }
            FeedEvent::RiskBreach { position_id, tier } => {
                match session.positions.get(position_id) {
                    None => return Ok(ApplyOutcome::Ignored(IgnoreReason::UnknownPosition)),
                    Some(p) if !p.is_open() => {
                        return Ok(ApplyOutcome::Ignored(IgnoreReason::PositionClosed))
                    }
                    Some(_) => {}
                }
                session.alerts.record(position_id, tier, Utc::now());
                tracing::warn!(position=%position_id, tier=%tier, "Guardian risk threshold breach");
                Vec::new()
            }
        };

        Ok(ApplyOutcome::Applied(
            touched
                .into_iter()
                .filter_map(|id| self.reassess(session, id))
                .collect(),
        ))
    }

    fn reassess(&self, session: &Session, id: PositionId) -> Option<AssessmentUpdate> {
        let position = session.positions.get(id).filter(|p| p.is_open())?;
        Some(AssessmentUpdate {
            position_id: id,
            asset: position.asset.clone(),
            health: interpret_health_factor(position.health_factor).ok(),
            outcome: self.assess(session, position),
        })
    }

    fn assess(&self, session: &Session, position: &Position) -> Result<RiskAssessment, RiskError> {
        let snapshot = session.market.current(&position.asset).ok_or_else(|| {
            RiskError::InvalidInput(format!("no market price for {} yet", position.asset))
        })?;
        self.engine.evaluate(position, snapshot)
    }

    fn view(&self, session: &Session, position: &Position) -> PositionView {
        PositionView {
            position: position.clone(),
            health: interpret_health_factor(position.health_factor).ok(),
            alert: session.alerts.get(position.id).cloned(),
            assessment: position
                .is_open()
                .then(|| self.assess(session, position)),
        }
    }

    fn publish(&self, update: AssessmentUpdate) {
        match &update.outcome {
            Ok(assessment) if assessment.risk_tier >= RiskTier::Critical => {
                tracing::warn!(
                    position=%update.position_id,
                    tier=%assessment.risk_tier,
                    distance_pct=%assessment.distance_to_liquidation_pct.round_dp(2),
                    "Position close to liquidation"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(position=%update.position_id, error=%e, "No assessment available");
            }
        }
        // No receivers is not an error: nobody is watching yet.
        let _ = self.updates.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const OWNER: &str = "0x00000000000000000000000000000000000000aa";

    fn monitor() -> Monitor {
        Monitor::new(&Config::from_env_map(HashMap::new()).unwrap())
    }

    fn price(raw: &str, sequence: u64) -> RawFeedEvent {
        RawFeedEvent::PriceUpdate {
            asset: "ETH".to_string(),
            price: raw.to_string(),
            sequence,
        }
    }

    #[tokio::test]
    async fn test_apply_without_session_fails() {
        let monitor = monitor();
        assert!(matches!(
            monitor.apply(&price("300000000000", 1)).await,
            Err(MonitorError::NoSession)
        ));
    }

    #[tokio::test]
    async fn test_reconnect_discards_state() {
        let monitor = monitor();
        let owner = Owner::parse(OWNER).unwrap();
        let first = monitor.connect(owner.clone()).await;
        monitor.apply(&price("300000000000", 1)).await.unwrap();
        assert_eq!(monitor.market().await.unwrap().len(), 1);

        let second = monitor.connect(owner).await;
        assert_ne!(first.id, second.id);
        assert!(monitor.market().await.unwrap().is_empty());

        assert_eq!(monitor.disconnect().await, Some(second.id));
        assert!(monitor.session_info().await.is_none());
        assert!(matches!(monitor.market().await, Err(MonitorError::NoSession)));
    }

    #[tokio::test]
    async fn test_unwatched_asset_ignored() {
        let monitor = monitor();
        monitor.connect(Owner::parse(OWNER).unwrap()).await;
        let outcome = monitor
            .apply(&RawFeedEvent::PriceUpdate {
                asset: "BTC".to_string(),
                price: "6000000000000".to_string(),
                sequence: 1,
            })
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Ignored(IgnoreReason::UnwatchedAsset));
    }

    #[tokio::test]
    async fn test_decode_error_surfaces() {
        let monitor = monitor();
        monitor.connect(Owner::parse(OWNER).unwrap()).await;
        assert!(matches!(
            monitor.apply(&price("-1", 1)).await,
            Err(MonitorError::Feed(_))
        ));
    }
}
