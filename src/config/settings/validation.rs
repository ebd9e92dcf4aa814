// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{DsidError, Result};

use super::Settings;

/// Upper bound for `discovery.timeout_ms` and `discovery.max_delay_ms`
pub const MAX_DISCOVERY_WAIT_MS: u64 = 60_000;

/// Upper bound for `discovery.retries`
pub const MAX_DISCOVERY_RETRIES: u32 = 10;

impl Settings {
    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        let discovery = &self.discovery;

        if discovery.timeout_ms == 0 {
            return Err(DsidError::Config(
                "discovery.timeout_ms must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&discovery.jitter) {
            return Err(DsidError::Config(format!(
                "discovery.jitter must be between 0.0 and 1.0, got {}",
                discovery.jitter
            )));
        }

        if discovery.timeout_ms > MAX_DISCOVERY_WAIT_MS {
            return Err(DsidError::Config(format!(
                "discovery.timeout_ms must not exceed {}, got {}",
                MAX_DISCOVERY_WAIT_MS, discovery.timeout_ms
            )));
        }

        if discovery.max_delay_ms > MAX_DISCOVERY_WAIT_MS {
            return Err(DsidError::Config(format!(
                "discovery.max_delay_ms must not exceed {}, got {}",
                MAX_DISCOVERY_WAIT_MS, discovery.max_delay_ms
            )));
        }

        if discovery.retries > MAX_DISCOVERY_RETRIES {
            return Err(DsidError::Config(format!(
                "discovery.retries must not exceed {}, got {}",
                MAX_DISCOVERY_RETRIES, discovery.retries
            )));
        }

        if discovery.max_delay_ms < discovery.base_delay_ms {
            return Err(DsidError::Config(
                "discovery.max_delay_ms must not be below discovery.base_delay_ms".to_string(),
            ));
        }

        if let Some(ds) = discovery
            .datasources
            .iter()
            .find(|ds| !ds.is_network_discoverable())
        {
            return Err(DsidError::Config(format!(
                "{} cannot be discovered over the network",
                ds
            )));
        }

        if !discovery.base_url.starts_with("http://") && !discovery.base_url.starts_with("https://")
        {
            return Err(DsidError::Config(format!(
                "discovery.base_url must be an http(s) URL, got {}",
                discovery.base_url
            )));
        }

        Ok(())
    }

    /// Total worst-case time one discovery probe may take, in milliseconds.
    pub fn discovery_budget_ms(&self) -> u64 {
        let d = &self.discovery;
        let attempts = u64::from(d.retries).saturating_add(1);
        attempts
            .saturating_mul(d.timeout_ms)
            .saturating_add(u64::from(d.retries).saturating_mul(d.max_delay_ms))
    }
}
