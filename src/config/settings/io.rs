// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Settings;

/// Settings file, relative to the filesystem root
pub const SETTINGS_FILE: &str = "etc/cloud/ds-identify.cfg";

/// Environment variable overriding the configured policy
pub const POLICY_ENV: &str = "DSID_POLICY";

impl Settings {
    /// Get the settings file path under a filesystem root.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(SETTINGS_FILE)
    }

    /// Load settings from the default path under `root`.
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_from(&Self::default_path(root))
    }

    /// Load settings from a specific path.
    ///
    /// A missing or empty file yields the defaults. Environment overrides
    /// are applied and the result is validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        settings.apply_env_overrides()?;
        settings.validate()?;

        tracing::debug!(
            target: "dsid.config",
            path = %path.display(),
            policy = %settings.policy,
            discovery = settings.discovery.enabled,
            "loaded settings"
        );
        Ok(settings)
    }

    /// Parse settings from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `DSID_POLICY`, if set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(policy) = std::env::var(POLICY_ENV) {
            self.policy = policy.parse()?;
        }
        Ok(())
    }
}
