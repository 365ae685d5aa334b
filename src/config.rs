//! Aggregation timing configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the two windows that shape a query's lifetime:
//! the burn-in period before the first combined publish, and the debounce
//! delay in front of the rate-limited gif source.

use crate::error::SearchError;
use std::time::Duration;

/// Configuration for a search controller.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How long arrivals are buffered before the first combined batch is
    /// published. Chosen so normally-fast sources settle before the first
    /// paint; it bounds the flicker-free wait, not overall search duration.
    pub burn_in_period: Duration,
    /// Quiescence period in front of the gif source. A query superseded
    /// within this window never dispatches a gif fetch at all.
    pub debounce_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            burn_in_period: Duration::from_millis(400),
            debounce_delay: Duration::from_millis(200),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `burn_in_period` must be greater than zero
    /// - `debounce_delay` must be greater than zero
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.burn_in_period.is_zero() {
            return Err(SearchError::Config(
                "burn_in_period must be greater than zero".into(),
            ));
        }
        if self.debounce_delay.is_zero() {
            return Err(SearchError::Config(
                "debounce_delay must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
