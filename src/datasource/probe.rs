// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Availability probes for statically configured datasources
//!
//! A probe answers "could this datasource work here?" from already
//! collected evidence. Probes never touch the network: they run before
//! networking is configured.

use super::kind::Datasource;
use super::signature;
use crate::evidence::EvidenceSnapshot;

/// Labels of a ConfigDrive filesystem
pub const CONFIG_DRIVE_LABELS: &[&str] = &["config-2", "CONFIG-2"];

/// Labels of a NoCloud seed filesystem
pub const NOCLOUD_LABELS: &[&str] = &["cidata", "CIDATA"];

/// Seed directory names NoCloud reads from
pub const NOCLOUD_SEED_DIRS: &[&str] = &["nocloud", "nocloud-net"];

/// Capability check for one datasource kind
pub trait AvailabilityProbe: Send + Sync {
    fn is_available(&self, datasource: Datasource, evidence: &EvidenceSnapshot) -> bool;
}

/// Default probe: decides purely from the evidence snapshot.
///
/// - `None` is always available.
/// - ConfigDrive needs a `config-2` filesystem.
/// - NoCloud needs a `cidata` filesystem, a populated seed directory, or its
///   DMI serial marker.
/// - Every other datasource needs its platform signature to match.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvidenceProbe;

impl AvailabilityProbe for EvidenceProbe {
    fn is_available(&self, datasource: Datasource, evidence: &EvidenceSnapshot) -> bool {
        let available = match datasource {
            Datasource::None => true,
            Datasource::ConfigDrive => has_any_label(evidence, CONFIG_DRIVE_LABELS),
            Datasource::NoCloud => {
                has_any_label(evidence, NOCLOUD_LABELS)
                    || NOCLOUD_SEED_DIRS
                        .iter()
                        .any(|dir| evidence.seed_dirs.contains(*dir))
                    || signature::matches(datasource, evidence)
            }
            other => signature::matches(other, evidence),
        };

        tracing::debug!(
            target: "dsid.datasource",
            datasource = %datasource,
            available,
            "availability probe"
        );
        available
    }
}

fn has_any_label(evidence: &EvidenceSnapshot, labels: &[&str]) -> bool {
    labels.iter().any(|label| evidence.fs_labels.contains(*label))
}
