//! Engine configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency increment: how far past the previous leader's ceiling
    /// the new visible bid is pushed. One unit of the item's currency
    /// by default.
    pub bid_increment: Decimal,

    /// Bounded wait for an item's critical section before the caller
    /// is told to retry.
    pub lock_wait: Duration,

    /// How many times a commit that hit a transient storage failure is
    /// re-attempted (each attempt re-snapshots and re-resolves).
    pub commit_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bid_increment: Decimal::ONE,
            lock_wait: Duration::from_secs(5),
            commit_retries: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.bid_increment, dec!(1));
        assert_eq!(config.lock_wait, Duration::from_secs(5));
        assert_eq!(config.commit_retries, 2);
    }
}
