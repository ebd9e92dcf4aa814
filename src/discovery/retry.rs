// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Retry delays for metadata probes, exponential backoff with jitter

use rand::Rng;
use std::time::Duration;

use crate::config::DiscoveryConfig;

/// Retry configuration for one probe
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay in milliseconds (exponentially increased)
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds
    pub max_delay_ms: u64,
    /// Jitter percentage (0.0 to 1.0)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for RetryConfig {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            max_retries: config.retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            jitter: config.jitter,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: base * 2^attempt
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let exponential_ms = self.base_delay_ms.saturating_mul(factor);
        let capped_ms = exponential_ms.min(self.max_delay_ms);

        let jitter_range = (capped_ms as f64 * self.jitter) as i64;
        let jitter_ms = if jitter_range > 0 {
            rand::rng().random_range(-jitter_range..=jitter_range)
        } else {
            0
        };

        let final_ms = (capped_ms as i64 + jitter_ms).max(0) as u64;
        Duration::from_millis(final_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay_ms, 250);
        assert_eq!(config.max_delay_ms, 2000);
    }

    #[test]
    fn test_calculate_delay() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 250,
            max_delay_ms: 2000,
            jitter: 0.0,
        };

        assert_eq!(config.calculate_delay(0).as_millis(), 250);
        assert_eq!(config.calculate_delay(1).as_millis(), 500);
        assert_eq!(config.calculate_delay(2).as_millis(), 1000);
        assert_eq!(config.calculate_delay(3).as_millis(), 2000);
        // capped
        assert_eq!(config.calculate_delay(10).as_millis(), 2000);
        assert_eq!(config.calculate_delay(200).as_millis(), 2000);
    }

    #[test]
    fn test_calculate_delay_with_jitter_stays_in_range() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 1000,
            jitter: 0.25,
        };
        for _ in 0..50 {
            let ms = config.calculate_delay(0).as_millis();
            assert!((750..=1250).contains(&ms), "delay {ms} out of range");
        }
    }
}
