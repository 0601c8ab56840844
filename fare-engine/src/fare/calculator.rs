//! Distance-to-price evaluation.

use rust_decimal::Decimal;

use super::config::FareConfig;

/// Prices a physical-hop distance using a [`FareConfig`].
#[derive(Debug, Clone)]
pub struct FareCalculator {
    config: FareConfig,
}

impl FareCalculator {
    /// Create a calculator. Tiers are sorted by ceiling so the first
    /// covering tier is always the tightest one.
    pub fn new(mut config: FareConfig) -> Self {
        config.tiers.sort_by_key(|t| t.max_distance);
        Self { config }
    }

    /// The fare table in use.
    pub fn config(&self) -> &FareConfig {
        &self.config
    }

    /// Price a journey of `distance` physical hops.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_engine::fare::{FareCalculator, FareConfig};
    /// use rust_decimal::Decimal;
    ///
    /// let calc = FareCalculator::new(FareConfig::default());
    /// assert_eq!(calc.price(2), Decimal::from(2));
    /// assert_eq!(calc.price(3), Decimal::from(3));
    /// assert_eq!(calc.price(17), Decimal::from(7));
    /// ```
    pub fn price(&self, distance: u32) -> Decimal {
        if let Some(tier) = self
            .config
            .tiers
            .iter()
            .find(|t| distance <= t.max_distance)
        {
            return tier.price;
        }

        if let Some(rule) = &self.config.overflow
            && rule.interval > 0
            && distance > rule.start_distance
        {
            let extra = distance - rule.start_distance;
            let intervals = extra.div_ceil(rule.interval);
            return rule.base_price + rule.price_per_interval * Decimal::from(intervals);
        }

        self.config.base_price
    }
}
