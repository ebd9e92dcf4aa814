// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for dsid
//!
//! Handles loading identification policy from /etc/cloud/ds-identify.cfg

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::datasource::Datasource;
use crate::error::DsidError;

mod io;
mod validation;

pub use io::{POLICY_ENV, SETTINGS_FILE};

/// Main settings structure, stored in ds-identify.cfg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Whether identification runs at all
    #[serde(default)]
    pub policy: Policy,

    /// Link-local discovery fallback settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Identification policy.
///
/// Parsed from a bare mode (`enabled`, `search`, `disabled`) or the
/// ds-identify form `search,found=all,maybe=all,notfound=disabled`, where
/// only the leading mode is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Policy {
    /// Run identification normally
    #[default]
    Enabled,
    /// Report "disabled" unless the kernel command line forces a datasource
    Disabled,
}

/// Per-outcome keys of the ds-identify policy string; accepted and ignored
const POLICY_OUTCOME_KEYS: &[&str] = &["found", "maybe", "notfound"];

impl FromStr for Policy {
    type Err = DsidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let mode = parts.next().unwrap_or_default().to_lowercase();

        let policy = match mode.as_str() {
            "enabled" | "search" => Policy::Enabled,
            "disabled" => Policy::Disabled,
            _ => return Err(DsidError::Config(format!("Unknown policy: {}", s))),
        };

        for part in parts.filter(|p| !p.is_empty()) {
            let key = part.split('=').next().unwrap_or_default();
            if POLICY_OUTCOME_KEYS.contains(&key) {
                tracing::debug!(target: "dsid.config", setting = part, "ignoring policy outcome setting");
            } else {
                tracing::warn!(target: "dsid.config", setting = part, "unknown policy setting");
            }
        }

        Ok(policy)
    }
}

impl TryFrom<String> for Policy {
    type Error = DsidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Enabled => write!(f, "enabled"),
            Policy::Disabled => write!(f, "disabled"),
        }
    }
}

/// Network discovery fallback configuration.
///
/// Only consulted on DMI-capable platforms that no strict signal identified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Allow probing link-local metadata services
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metadata service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt, per datasource
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base delay between retries in milliseconds (doubled each attempt)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Jitter fraction applied to retry delays (0.0 to 1.0)
    #[serde(default = "default_jitter")]
    pub jitter: f64,

    /// Datasources to probe, in order
    #[serde(default = "default_discovery_datasources")]
    pub datasources: Vec<Datasource>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
            datasources: default_discovery_datasources(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://169.254.169.254".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_jitter() -> f64 {
    0.25
}

fn default_discovery_datasources() -> Vec<Datasource> {
    vec![
        Datasource::OpenStack,
        Datasource::Ec2,
        Datasource::GCE,
        Datasource::DigitalOcean,
    ]
}
