//! Domain primitives: Sequence, PositionId, Owner, Asset, Direction.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Monotonic observation marker carried by the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence(pub u64);

impl Sequence {
    /// Create a Sequence from a raw marker.
    pub fn new(seq: u64) -> Self {
        Sequence(seq)
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger-assigned position identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl PositionId {
    /// Create a PositionId from the ledger id.
    pub fn new(id: u64) -> Self {
        PositionId(id)
    }

    /// Get the underlying ledger id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rejected primitive input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveParseError {
    #[error("invalid owner address: {0}")]
    Owner(String),
    #[error("invalid asset symbol: {0:?}")]
    Asset(String),
    #[error("unknown direction: {0}")]
    Direction(String),
}

/// Account address (0x-prefixed, 20 bytes of hex).
///
/// Stored lowercase so that equality is case-insensitive, matching how wallets
/// and the ledger disagree on checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Owner(String);

impl Owner {
    /// Parse and normalize a 0x-prefixed 20-byte hex address.
    pub fn parse(addr: &str) -> Result<Self, PrimitiveParseError> {
        let trimmed = addr.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| PrimitiveParseError::Owner(addr.to_string()))?;

        if body.len() != 40 || hex::decode(body).is_err() {
            return Err(PrimitiveParseError::Owner(addr.to_string()));
        }

        Ok(Owner(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Get the value as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Owner {
    type Err = PrimitiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Owner::parse(s)
    }
}

impl TryFrom<String> for Owner {
    type Error = PrimitiveParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Owner::parse(&value)
    }
}

impl From<Owner> for String {
    fn from(value: Owner) -> Self {
        value.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Underlying asset symbol (e.g., "ETH"), normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset(String);

impl Asset {
    /// Parse an alphanumeric symbol, uppercasing it.
    pub fn parse(symbol: &str) -> Result<Self, PrimitiveParseError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PrimitiveParseError::Asset(symbol.to_string()));
        }
        Ok(Asset(trimmed.to_ascii_uppercase()))
    }

    /// Get the value as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Asset {
    type Err = PrimitiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Asset::parse(s)
    }
}

impl TryFrom<String> for Asset {
    type Error = PrimitiveParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Asset::parse(&value)
    }
}

impl From<Asset> for String {
    fn from(value: Asset) -> Self {
        value.0
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Profits when the price rises.
    Long,
    /// Profits when the price falls.
    Short,
}

impl Direction {
    /// Decode the leverage manager's `PositionType` enum index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::Long),
            1 => Some(Direction::Short),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = PrimitiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            _ => Err(PrimitiveParseError::Direction(s.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

    #[test]
    fn test_owner_normalizes_case() {
        let a = Owner::parse(ADDR).unwrap();
        let b = Owner::parse(&ADDR.to_lowercase()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_owner_rejects_bad_input() {
        assert!(Owner::parse("abcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(Owner::parse("0x123").is_err());
        assert!(Owner::parse("0xzzcdef0123456789abcdef0123456789abcdef01").is_err());
    }

    #[test]
    fn test_owner_serde_validates() {
        let ok: Owner = serde_json::from_str(&format!("\"{}\"", ADDR)).unwrap();
        assert_eq!(serde_json::to_string(&ok).unwrap(), format!("\"{}\"", ADDR.to_lowercase()));
        assert!(serde_json::from_str::<Owner>("\"0x1\"").is_err());
    }

    #[test]
    fn test_asset_uppercases() {
        assert_eq!(Asset::parse(" eth ").unwrap().as_str(), "ETH");
        assert!(Asset::parse("").is_err());
        assert!(Asset::parse("ETH/USD").is_err());
    }

    #[test]
    fn test_direction_index_and_serde() {
        assert_eq!(Direction::from_index(0), Some(Direction::Long));
        assert_eq!(Direction::from_index(1), Some(Direction::Short));
        assert_eq!(Direction::from_index(2), None);
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"short\"");
        assert_eq!("LONG".parse::<Direction>().unwrap(), Direction::Long);
    }

    #[test]
    fn test_sequence_ordering() {
        assert!(Sequence::new(1) < Sequence::new(2));
    }
}
