// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Engine states and non-fatal diagnostics

use serde::{Deserialize, Serialize};

use crate::datasource::Datasource;

/// Steps of the single-pass identification state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineState {
    Start,
    CheckCmdlineOverride,
    CheckPolicy,
    CheckDmi,
    CheckStaticConfig,
    CheckLegacyDiscovery,
    Disabled,
    Terminal,
}

/// Where an unrecognized datasource name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideSource {
    KernelCmdline,
    StaticConfig,
}

impl std::fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideSource::KernelCmdline => write!(f, "kernel command line"),
            OverrideSource::StaticConfig => write!(f, "datasource_list"),
        }
    }
}

/// Something worth reporting that did not stop identification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// Unknown datasource name; excluded from evaluation
    UnrecognizedOverride { source: OverrideSource, name: String },
    /// Platform exposes no DMI data; DMI matching and discovery skipped
    NoDmiEvidence,
    /// Several signatures matched; resolved by fixed precedence
    AmbiguousDmiMatch {
        matches: Vec<Datasource>,
        selected: Datasource,
    },
    /// A discovery probe timed out; counted as a failed probe
    DiscoveryTimeout { datasource: Datasource },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnrecognizedOverride { source, name } => {
                write!(f, "unrecognized datasource '{}' in {}", name, source)
            }
            Diagnostic::NoDmiEvidence => write!(f, "no DMI evidence on this platform"),
            Diagnostic::AmbiguousDmiMatch { matches, selected } => {
                let names: Vec<&str> = matches.iter().map(|ds| ds.name()).collect();
                write!(
                    f,
                    "DMI matched {}; selected {} by precedence",
                    names.join(", "),
                    selected
                )
            }
            Diagnostic::DiscoveryTimeout { datasource } => {
                write!(f, "metadata probe for {} timed out", datasource)
            }
        }
    }
}
