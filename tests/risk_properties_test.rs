use guardtrade::engine::{classify_risk_tier, compute_liquidation_price, compute_pnl};
use guardtrade::{
    Asset, Decimal, Direction, MarketSnapshot, Owner, Position, PositionId, RiskEngine, RiskTier,
    Sequence,
};
use proptest::prelude::*;
use rust_decimal::Decimal as RustDecimal;

/// Two-decimal price/collateral from a cent amount.
fn cents(n: i64) -> Decimal {
    Decimal::new(RustDecimal::new(n, 2))
}

/// Leverage in tenths, so 10 => 1.0x and 1000 => 100.0x.
fn tenths(n: i64) -> Decimal {
    Decimal::new(RustDecimal::new(n, 1))
}

fn position(direction: Direction, collateral: Decimal, leverage: Decimal, entry: Decimal) -> Position {
    Position::new(
        PositionId::new(7),
        Owner::parse("0x00000000000000000000000000000000000000aa").unwrap(),
        Asset::parse("ETH").unwrap(),
        direction,
        collateral,
        leverage,
        Some(entry),
        Decimal::one(),
    )
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Long), Just(Direction::Short)]
}

proptest! {
    #[test]
    fn liquidation_sits_on_the_losing_side_of_entry(
        entry in 1i64..=10_000_000,
        lev in 10i64..=1_000,
    ) {
        let entry = cents(entry);
        let lev = tenths(lev);

        let long = compute_liquidation_price(entry, lev, Direction::Long).unwrap();
        let short = compute_liquidation_price(entry, lev, Direction::Short).unwrap();

        prop_assert!(long < entry);
        prop_assert!(short > entry);

        let expected_long = entry.inner() * (lev.inner() - RustDecimal::ONE) / lev.inner();
        let expected_short = entry.inner() * (lev.inner() + RustDecimal::ONE) / lev.inner();
        prop_assert_eq!(long.inner(), expected_long);
        prop_assert_eq!(short.inner(), expected_short);
    }

    #[test]
    fn pnl_is_strictly_monotonic_in_price(
        collateral in 1i64..=100_000_000,
        lev in 10i64..=1_000,
        entry in 100i64..=10_000_000,
        p1 in 1i64..=10_000_000,
        bump in 1i64..=1_000_000,
    ) {
        let (low, high) = (cents(p1), cents(p1 + bump));
        let long = position(Direction::Long, cents(collateral), tenths(lev), cents(entry));
        let short = position(Direction::Short, cents(collateral), tenths(lev), cents(entry));

        prop_assert!(compute_pnl(&long, low).unwrap() < compute_pnl(&long, high).unwrap());
        prop_assert!(compute_pnl(&short, low).unwrap() > compute_pnl(&short, high).unwrap());
    }

    #[test]
    fn long_and_short_mirror_each_other(
        collateral in 1i64..=100_000_000,
        lev in 10i64..=1_000,
        entry in 200i64..=10_000_000,
        frac in 1u32..=99,
    ) {
        let entry_c = entry;
        let delta = (entry_c * i64::from(frac) / 100).max(1);
        let long = position(Direction::Long, cents(collateral), tenths(lev), cents(entry_c));
        let short = position(Direction::Short, cents(collateral), tenths(lev), cents(entry_c));

        let long_up = compute_pnl(&long, cents(entry_c + delta)).unwrap();
        let short_down = compute_pnl(&short, cents(entry_c - delta)).unwrap();
        prop_assert_eq!(long_up, short_down);

        let long_at_entry = compute_pnl(&long, cents(entry_c)).unwrap();
        prop_assert!(long_at_entry.is_zero());
    }

    #[test]
    fn evaluation_is_idempotent(
        dir in direction(),
        collateral in 1i64..=100_000_000,
        lev in 10i64..=1_000,
        entry in 1i64..=10_000_000,
        price in 1i64..=10_000_000,
    ) {
        let engine = RiskEngine::default();
        let pos = position(dir, cents(collateral), tenths(lev), cents(entry));
        let snapshot = MarketSnapshot::new(Asset::parse("ETH").unwrap(), cents(price), Sequence::new(1));

        let first = engine.evaluate(&pos, &snapshot).unwrap();
        let second = engine.evaluate(&pos, &snapshot).unwrap();
        prop_assert_eq!(first, second);
        prop_assert!(!first.distance_to_liquidation_pct.is_negative());
    }

    #[test]
    fn at_or_past_liquidation_has_no_distance_left(
        dir in direction(),
        collateral in 1i64..=100_000_000,
        lev in 11i64..=1_000,
        entry in 100i64..=10_000_000,
        pct in 1i64..=500,
    ) {
        let engine = RiskEngine::default();
        let pos = position(dir, cents(collateral), tenths(lev), cents(entry));
        let liquidation = compute_liquidation_price(cents(entry), tenths(lev), dir).unwrap();

        // Long: liquidation * (pct/100) with pct <= 100. Short: liquidation * (1 + pct/100).
        let factor = match dir {
            Direction::Long => Decimal::new(RustDecimal::new(pct.min(100), 2)),
            Direction::Short => Decimal::one() + Decimal::new(RustDecimal::new(pct, 2)),
        };
        let price = liquidation.checked_mul(factor).unwrap();
        prop_assume!(price.is_positive());

        let snapshot = MarketSnapshot::new(Asset::parse("ETH").unwrap(), price, Sequence::new(1));
        let assessment = engine.evaluate(&pos, &snapshot).unwrap();
        prop_assert!(assessment.distance_to_liquidation_pct.is_zero());
        prop_assert_eq!(assessment.risk_tier, RiskTier::ImmediateRisk);
    }

    #[test]
    fn tier_never_improves_as_distance_shrinks(
        near in 0i64..=5_000,
        gap in 0i64..=5_000,
    ) {
        let closer = classify_risk_tier(cents(near));
        let further = classify_risk_tier(cents(near + gap));
        prop_assert!(closer >= further);
    }
}
