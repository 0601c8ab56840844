//! Engine configuration read from the environment.
//!
//! All values are optional; unset variables keep the defaults. The
//! configuration is read once at startup and never re-read per request.
//!
//! | Variable | Format |
//! |---|---|
//! | `SUBWAY_FARE_BASE_PRICE` | decimal, e.g. `2.00` |
//! | `SUBWAY_FARE_BASE_DISTANCE` | integer |
//! | `SUBWAY_FARE_RULES` | `ceiling:price,...`, e.g. `2:2,4:3,7:4` |
//! | `SUBWAY_FARE_EXTRA` | `start:interval:per_interval:base`, empty to disable |
//! | `SUBWAY_GRAPH_COST_PER_STATION` | integer |
//! | `SUBWAY_GRAPH_COST_PER_TRANSFER` | integer |

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fare::{FareConfig, FareTier, OverflowRule};
use crate::graph::CostConfig;

pub const ENV_BASE_PRICE: &str = "SUBWAY_FARE_BASE_PRICE";
pub const ENV_BASE_DISTANCE: &str = "SUBWAY_FARE_BASE_DISTANCE";
pub const ENV_RULES: &str = "SUBWAY_FARE_RULES";
pub const ENV_EXTRA: &str = "SUBWAY_FARE_EXTRA";
pub const ENV_COST_PER_STATION: &str = "SUBWAY_GRAPH_COST_PER_STATION";
pub const ENV_COST_PER_TRANSFER: &str = "SUBWAY_GRAPH_COST_PER_TRANSFER";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has a value that cannot be parsed
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The overflow rule would divide by zero
    #[error("overflow interval must be greater than 0")]
    ZeroInterval,
}

/// Everything the engine needs besides topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fare: FareConfig,
    #[serde(default)]
    pub costs: CostConfig,
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// # Example
    ///
    /// ```
    /// use fare_engine::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_lookup(|key| match key {
    ///     "SUBWAY_GRAPH_COST_PER_TRANSFER" => Some("500".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.costs.cost_per_transfer, 500);
    /// assert_eq!(config.costs.cost_per_station, 100);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_BASE_PRICE) {
            config.fare.base_price = parse_decimal(ENV_BASE_PRICE, &v)?;
        }
        if let Some(v) = lookup(ENV_BASE_DISTANCE) {
            config.fare.base_distance = parse_u32(ENV_BASE_DISTANCE, &v)?;
        }
        if let Some(v) = lookup(ENV_RULES) {
            config.fare.tiers = parse_tiers(&v)?;
        }
        if let Some(v) = lookup(ENV_EXTRA) {
            config.fare.overflow = parse_overflow(&v)?;
        }
        if let Some(v) = lookup(ENV_COST_PER_STATION) {
            config.costs.cost_per_station = parse_u32(ENV_COST_PER_STATION, &v)?;
        }
        if let Some(v) = lookup(ENV_COST_PER_TRANSFER) {
            config.costs.cost_per_transfer = parse_u32(ENV_COST_PER_TRANSFER, &v)?;
        }

        config.fare = config.fare.normalized()?;
        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}

fn parse_u32(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(var, value, "expected a non-negative integer"))
}

fn parse_decimal(var: &'static str, value: &str) -> Result<Decimal, ConfigError> {
    let d = Decimal::from_str(value.trim()).map_err(|_| invalid(var, value, "expected a decimal"))?;
    if d.is_sign_negative() {
        return Err(invalid(var, value, "price must not be negative"));
    }
    Ok(d)
}

fn parse_tiers(value: &str) -> Result<Vec<FareTier>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (ceiling, price) = entry
                .split_once(':')
                .ok_or_else(|| invalid(ENV_RULES, value, "expected ceiling:price pairs"))?;
            Ok(FareTier::new(
                parse_u32(ENV_RULES, ceiling)?,
                parse_decimal(ENV_RULES, price)?,
            ))
        })
        .collect()
}

fn parse_overflow(value: &str) -> Result<Option<OverflowRule>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    let [start, interval, per_interval, base] = parts.as_slice() else {
        return Err(invalid(
            ENV_EXTRA,
            value,
            "expected start:interval:per_interval:base",
        ));
    };

    Ok(Some(OverflowRule {
        start_distance: parse_u32(ENV_EXTRA, start)?,
        interval: parse_u32(ENV_EXTRA, interval)?,
        price_per_interval: parse_decimal(ENV_EXTRA, per_interval)?,
        base_price: parse_decimal(ENV_EXTRA, base)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (ENV_BASE_PRICE, "1.50"),
            (ENV_BASE_DISTANCE, "3"),
            (ENV_RULES, "4:3.00, 2:2.00"),
            (ENV_EXTRA, "4:2:0.50:3.00"),
            (ENV_COST_PER_STATION, "10"),
            (ENV_COST_PER_TRANSFER, "45"),
        ]))
        .unwrap();

        assert_eq!(config.fare.base_price, Decimal::new(150, 2));
        assert_eq!(config.fare.base_distance, 3);
        assert_eq!(
            config.fare.tiers,
            vec![
                FareTier::new(2, Decimal::from(2)),
                FareTier::new(4, Decimal::from(3)),
            ],
            "tiers sorted ascending"
        );
        assert_eq!(
            config.fare.overflow,
            Some(OverflowRule {
                start_distance: 4,
                interval: 2,
                price_per_interval: Decimal::new(50, 2),
                base_price: Decimal::from(3),
            })
        );
        assert_eq!(config.costs, CostConfig::new(10, 45));
    }

    #[test]
    fn empty_rules_and_extra_disable_them() {
        let config =
            EngineConfig::from_lookup(lookup_from(&[(ENV_RULES, ""), (ENV_EXTRA, "none")]))
                .unwrap();
        assert!(config.fare.tiers.is_empty());
        assert!(config.fare.overflow.is_none());
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_COST_PER_STATION, "lots")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid SUBWAY_GRAPH_COST_PER_STATION=\"lots\": expected a non-negative integer"
        );
    }

    #[test]
    fn rejects_malformed_rules() {
        assert!(EngineConfig::from_lookup(lookup_from(&[(ENV_RULES, "2-2.00")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[(ENV_RULES, "2:abc")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[(ENV_BASE_PRICE, "-1")])).is_err());
    }

    #[test]
    fn rejects_malformed_extra() {
        assert!(EngineConfig::from_lookup(lookup_from(&[(ENV_EXTRA, "16:4:1")])).is_err());
        assert_eq!(
            EngineConfig::from_lookup(lookup_from(&[(ENV_EXTRA, "16:0:1:6")])),
            Err(ConfigError::ZeroInterval)
        );
    }

    #[test]
    fn deserializes_from_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"costs": {"cost_per_station": 1, "cost_per_transfer": 2}}"#)
                .unwrap();
        assert_eq!(config.costs, CostConfig::new(1, 2));
        assert_eq!(config.fare, FareConfig::default());
    }
}
