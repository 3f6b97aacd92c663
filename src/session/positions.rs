use super::SessionError;
use crate::domain::{Asset, Decimal, Position, PositionId, PositionState};
use std::collections::BTreeMap;

/// In-memory keyed store of the session's positions.
///
/// Ordered by id so listings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: BTreeMap<PositionId, Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly opened position.
    pub fn open(&mut self, position: Position) -> Result<&Position, SessionError> {
        if self.positions.contains_key(&position.id) {
            return Err(SessionError::DuplicatePosition(position.id));
        }
        let id = position.id;
        Ok(self.positions.entry(id).or_insert(position))
    }

    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn open_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values().filter(|p| p.is_open())
    }

    pub fn open_positions_for<'a>(
        &'a self,
        asset: &'a Asset,
    ) -> impl Iterator<Item = &'a Position> + 'a {
        self.open_positions().filter(move |p| &p.asset == asset)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Apply a ledger `PositionUpdate`: only collateral and health factor move.
    pub fn apply_update(
        &mut self,
        id: PositionId,
        collateral: Decimal,
        health_factor: Decimal,
    ) -> Result<&Position, SessionError> {
        if collateral.is_negative() {
            return Err(SessionError::InvalidUpdate(format!(
                "collateral for {} must be non-negative, got {}",
                id, collateral
            )));
        }
        let position = self.open_mut(id)?;
        position.collateral = collateral;
        position.health_factor = health_factor;
        Ok(&*position)
    }

    /// Record the confirmed entry price. Setting the same value again is a no-op.
    pub fn confirm_entry(
        &mut self,
        id: PositionId,
        entry_price: Decimal,
    ) -> Result<&Position, SessionError> {
        if !entry_price.is_positive() {
            return Err(SessionError::InvalidUpdate(format!(
                "entry price for {} must be positive, got {}",
                id, entry_price
            )));
        }
        let position = self.open_mut(id)?;
        match position.entry_price {
            Some(existing) if existing != entry_price => {
                return Err(SessionError::EntryAlreadySet { id, existing });
            }
            _ => position.entry_price = Some(entry_price),
        }
        Ok(&*position)
    }

    pub fn close(&mut self, id: PositionId) -> Result<&Position, SessionError> {
        let position = self.open_mut(id)?;
        position.state = PositionState::Closed;
        Ok(&*position)
    }

    fn open_mut(&mut self, id: PositionId) -> Result<&mut Position, SessionError> {
        let position = self
            .positions
            .get_mut(&id)
            .ok_or(SessionError::UnknownPosition(id))?;
        if !position.is_open() {
            return Err(SessionError::PositionClosed(id));
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Owner};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn eth_long(id: u64, entry: Option<&str>) -> Position {
        Position::new(
            PositionId::new(id),
            Owner::parse("0x00000000000000000000000000000000000000aa").unwrap(),
            Asset::parse("ETH").unwrap(),
            Direction::Long,
            d("1000"),
            d("3"),
            entry.map(d),
            d("1"),
        )
    }

    #[test]
    fn test_open_rejects_duplicates() {
        let mut book = PositionBook::new();
        book.open(eth_long(1, Some("3000"))).unwrap();
        assert_eq!(
            book.open(eth_long(1, Some("3100"))).unwrap_err(),
            SessionError::DuplicatePosition(PositionId::new(1))
        );
        assert_eq!(book.get(PositionId::new(1)).unwrap().entry_price, Some(d("3000")));
    }

    #[test]
    fn test_update_keeps_entry_price() {
        let mut book = PositionBook::new();
        book.open(eth_long(1, Some("3000"))).unwrap();

        let updated = book
            .apply_update(PositionId::new(1), d("1200"), d("0.4"))
            .unwrap();
        assert_eq!(updated.collateral, d("1200"));
        assert_eq!(updated.health_factor, d("0.4"));
        assert_eq!(updated.entry_price, Some(d("3000")));
        assert_eq!(updated.leverage, d("3"));
    }

    #[test]
    fn test_update_unknown_position() {
        let mut book = PositionBook::new();
        assert_eq!(
            book.apply_update(PositionId::new(7), d("1"), d("1")).unwrap_err(),
            SessionError::UnknownPosition(PositionId::new(7))
        );
    }

    #[test]
    fn test_confirm_entry_once() {
        let mut book = PositionBook::new();
        book.open(eth_long(1, None)).unwrap();

        book.confirm_entry(PositionId::new(1), d("3000")).unwrap();
        book.confirm_entry(PositionId::new(1), d("3000")).unwrap();
        assert!(matches!(
            book.confirm_entry(PositionId::new(1), d("2900")),
            Err(SessionError::EntryAlreadySet { .. })
        ));
        assert!(book.confirm_entry(PositionId::new(1), Decimal::zero()).is_err());
    }

    #[test]
    fn test_close_exactly_once() {
        let mut book = PositionBook::new();
        book.open(eth_long(1, Some("3000"))).unwrap();

        book.close(PositionId::new(1)).unwrap();
        assert_eq!(
            book.close(PositionId::new(1)).unwrap_err(),
            SessionError::PositionClosed(PositionId::new(1))
        );
        assert_eq!(book.get(PositionId::new(1)).unwrap().state, PositionState::Closed);
        assert!(book
            .apply_update(PositionId::new(1), d("1"), d("1"))
            .is_err());
    }

    #[test]
    fn test_open_positions_filters_closed_and_asset() {
        let mut book = PositionBook::new();
        book.open(eth_long(1, Some("3000"))).unwrap();
        book.open(eth_long(2, Some("3000"))).unwrap();
        let mut btc = eth_long(3, Some("60000"));
        btc.asset = Asset::parse("BTC").unwrap();
        book.open(btc).unwrap();
        book.close(PositionId::new(2)).unwrap();

        let eth = Asset::parse("ETH").unwrap();
        let ids: Vec<_> = book.open_positions_for(&eth).map(|p| p.id.as_u64()).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(book.open_positions().count(), 2);
        assert_eq!(book.len(), 3);
    }
}
