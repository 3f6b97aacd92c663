use crate::domain::{Asset, Decimal, Owner};
use crate::engine::TierTable;
use crate::feed::FixedPointCodec;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub watched_assets: Vec<Asset>,
    pub codec: FixedPointCodec,
    pub tiers: TierTable,
    pub update_channel_capacity: usize,
    /// Session opened at startup, if set.
    pub default_owner: Option<Owner>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or(&env_map, "PORT", "8080", "must be a valid u16")?;

        let watched_assets = parse_watched_assets(&env_map)?;

        let price_decimals = parse_or(&env_map, "PRICE_DECIMALS", "8", "must be a valid u32")?;
        let amount_decimals = parse_or(&env_map, "AMOUNT_DECIMALS", "8", "must be a valid u32")?;
        let health_decimals =
            parse_or(&env_map, "HEALTH_FACTOR_DECIMALS", "18", "must be a valid u32")?;
        let codec = FixedPointCodec::new(price_decimals, amount_decimals, health_decimals)
            .map_err(|e| ConfigError::InvalidValue("*_DECIMALS".to_string(), e.to_string()))?;

        let safe_above: Decimal =
            parse_or(&env_map, "RISK_SAFE_ABOVE_PCT", "20", "must be a decimal")?;
        let warning_above: Decimal =
            parse_or(&env_map, "RISK_WARNING_ABOVE_PCT", "10", "must be a decimal")?;
        let critical_above: Decimal =
            parse_or(&env_map, "RISK_CRITICAL_ABOVE_PCT", "5", "must be a decimal")?;
        let tiers = TierTable::new(safe_above, warning_above, critical_above).map_err(|e| {
            ConfigError::InvalidValue("RISK_*_ABOVE_PCT".to_string(), e.to_string())
        })?;

        let update_channel_capacity: usize = parse_or(
            &env_map,
            "UPDATE_CHANNEL_CAPACITY",
            "256",
            "must be a valid usize",
        )?;
        if update_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "UPDATE_CHANNEL_CAPACITY".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let default_owner = match env_map.get("DEFAULT_OWNER") {
            Some(raw) if !raw.trim().is_empty() => Some(Owner::parse(raw).map_err(|e| {
                ConfigError::InvalidValue("DEFAULT_OWNER".to_string(), e.to_string())
            })?),
            _ => None,
        };

        Ok(Config {
            port,
            watched_assets,
            codec,
            tiers,
            update_channel_capacity,
            default_owner,
        })
    }
}

fn parse_or<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
    expectation: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.trim())
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), expectation.to_string()))
}

fn parse_watched_assets(env_map: &HashMap<String, String>) -> Result<Vec<Asset>, ConfigError> {
    let raw = env_map
        .get("WATCHED_ASSETS")
        .map(|s| s.as_str())
        .unwrap_or("ETH");

    let assets = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            Asset::parse(s)
                .map_err(|e| ConfigError::InvalidValue("WATCHED_ASSETS".to_string(), e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if assets.is_empty() {
        return Err(ConfigError::MissingEnv("WATCHED_ASSETS".to_string()));
    }
    Ok(assets)
}
