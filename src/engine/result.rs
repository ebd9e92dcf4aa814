// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Identification outcomes

use serde::{Deserialize, Serialize};

use super::diagnostic::{Diagnostic, EngineState};
use crate::datasource::Datasource;

/// How a candidate was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryKind {
    /// Platform signature in DMI data
    DmiStrict,
    /// `ds=<name>` on the kernel command line
    CmdlineForced,
    /// Entry of the static `datasource_list` that passed its probe
    StaticConfig,
    /// Explicit `None` entry of the static `datasource_list`
    NoneFallback,
    /// Link-local metadata service answered
    NetworkDiscovery,
}

impl std::fmt::Display for DiscoveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiscoveryKind::DmiStrict => "dmi-strict",
            DiscoveryKind::CmdlineForced => "cmdline-forced",
            DiscoveryKind::StaticConfig => "static-config",
            DiscoveryKind::NoneFallback => "none-fallback",
            DiscoveryKind::NetworkDiscovery => "network-discovery",
        };
        f.write_str(s)
    }
}

/// The datasource the engine settled on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasourceCandidate {
    pub datasource: Datasource,
    /// Set for `ds=` overrides and for a sole static-list entry
    pub explicitly_forced: bool,
    pub discovery: DiscoveryKind,
}

impl DatasourceCandidate {
    pub fn new(datasource: Datasource, discovery: DiscoveryKind, explicitly_forced: bool) -> Self {
        Self {
            datasource,
            explicitly_forced,
            discovery,
        }
    }
}

/// Why no datasource was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisabledReason {
    /// Settings policy is `disabled`
    Policy,
    /// No strict signal and the platform exposes no DMI, so network
    /// discovery is not allowed
    NoDmiEvidence,
    /// No strict signal and network discovery is turned off
    DiscoveryDisabled,
    /// Network discovery ran and nothing answered
    NothingDiscovered,
    /// The boot supervisor cancelled identification
    Cancelled,
}

impl std::fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DisabledReason::Policy => "policy is disabled",
            DisabledReason::NoDmiEvidence => "no strict signal and no DMI evidence",
            DisabledReason::DiscoveryDisabled => "no strict signal and discovery is disabled",
            DisabledReason::NothingDiscovered => "no metadata service answered",
            DisabledReason::Cancelled => "identification was cancelled",
        };
        f.write_str(s)
    }
}

/// Final engine decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum IdentificationResult {
    /// Run this datasource's configuration stage
    Selected(DatasourceCandidate),
    /// Perform no boot-time configuration. Not an error.
    Disabled { reason: DisabledReason },
}

impl IdentificationResult {
    pub fn selected(datasource: Datasource, discovery: DiscoveryKind, forced: bool) -> Self {
        IdentificationResult::Selected(DatasourceCandidate::new(datasource, discovery, forced))
    }

    pub fn disabled(reason: DisabledReason) -> Self {
        IdentificationResult::Disabled { reason }
    }

    pub fn candidate(&self) -> Option<&DatasourceCandidate> {
        match self {
            IdentificationResult::Selected(candidate) => Some(candidate),
            IdentificationResult::Disabled { .. } => None,
        }
    }

    pub fn datasource(&self) -> Option<Datasource> {
        self.candidate().map(|c| c.datasource)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, IdentificationResult::Disabled { .. })
    }
}

impl std::fmt::Display for IdentificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentificationResult::Selected(c) => {
                write!(f, "{} ({})", c.datasource, c.discovery)?;
                if c.explicitly_forced {
                    write!(f, " [forced]")?;
                }
                Ok(())
            }
            IdentificationResult::Disabled { reason } => write!(f, "disabled: {}", reason),
        }
    }
}

/// Result plus the path the engine took to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationReport {
    pub result: IdentificationResult,
    /// States visited, in order, ending with `Terminal`
    pub states: Vec<EngineState>,
    /// Non-fatal problems found along the way
    pub diagnostics: Vec<Diagnostic>,
}
