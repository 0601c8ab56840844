//! Fare rule table configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One tier: distances up to and including `max_distance` cost `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareTier {
    pub max_distance: u32,
    pub price: Decimal,
}

impl FareTier {
    pub fn new(max_distance: u32, price: Decimal) -> Self {
        Self {
            max_distance,
            price,
        }
    }
}

/// Pricing for distances beyond the tier table.
///
/// A distance `d > start_distance` costs
/// `base_price + ceil((d - start_distance) / interval) * price_per_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowRule {
    pub start_distance: u32,
    pub interval: u32,
    pub price_per_interval: Decimal,
    /// Price at exactly `start_distance`.
    pub base_price: Decimal,
}

/// The full fare table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareConfig {
    /// Flat price used when neither a tier nor the overflow rule applies.
    #[serde(default = "default_base_price")]
    pub base_price: Decimal,

    /// Distance covered by the base fare. Informational; pricing is
    /// driven entirely by the tiers.
    #[serde(default = "default_base_distance")]
    pub base_distance: u32,

    /// Tiers in ascending `max_distance` order.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<FareTier>,

    #[serde(default = "default_overflow")]
    pub overflow: Option<OverflowRule>,
}

fn default_base_price() -> Decimal {
    Decimal::new(200, 2)
}

const fn default_base_distance() -> u32 {
    2
}

/// Hangzhou metro distance bands.
fn default_tiers() -> Vec<FareTier> {
    vec![
        FareTier::new(2, Decimal::from(2)),
        FareTier::new(4, Decimal::from(3)),
        FareTier::new(7, Decimal::from(4)),
        FareTier::new(12, Decimal::from(5)),
        FareTier::new(16, Decimal::from(6)),
    ]
}

fn default_overflow() -> Option<OverflowRule> {
    Some(OverflowRule {
        start_distance: 16,
        interval: 4,
        price_per_interval: Decimal::from(1),
        base_price: Decimal::from(6),
    })
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            base_distance: default_base_distance(),
            tiers: default_tiers(),
            overflow: default_overflow(),
        }
    }
}

impl FareConfig {
    /// A table with only a flat price: no tiers, no overflow.
    pub fn flat(price: Decimal) -> Self {
        Self {
            base_price: price,
            base_distance: 0,
            tiers: Vec::new(),
            overflow: None,
        }
    }

    /// Sort tiers ascending and check the overflow rule.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.tiers.sort_by_key(|t| t.max_distance);
        if let Some(rule) = &self.overflow
            && rule.interval == 0
        {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(self)
    }
}
