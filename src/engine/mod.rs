// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Datasource identification engine
//!
//! Decides, once per boot and before networking is configured, which
//! datasource this system runs on. Signals are consulted in strict priority
//! order and the first definitive answer wins:
//!
//! 1. `ds=<name>` on the kernel command line (no availability check)
//! 2. settings policy (`disabled` stops here)
//! 3. DMI platform signatures, ties broken by [`PRECEDENCE`]
//! 4. the static `datasource_list`, entries gated by availability probes
//! 5. without DMI: disabled, never network discovery
//! 6. with DMI: bounded link-local discovery, else disabled
//!
//! [`PRECEDENCE`]: crate::datasource::PRECEDENCE

pub mod diagnostic;
pub mod result;

pub use diagnostic::{Diagnostic, EngineState, OverrideSource};
pub use result::{
    DatasourceCandidate, DisabledReason, DiscoveryKind, IdentificationReport,
    IdentificationResult,
};

use std::future::Future;
use std::sync::Arc;

use crate::config::{Policy, Settings};
use crate::datasource::{signature, AvailabilityProbe, Datasource, EvidenceProbe};
use crate::discovery::{HttpMetadataProber, MetadataProber, ProbeOutcome};
use crate::error::Result;
use crate::evidence::EvidenceSnapshot;

/// States and diagnostics accumulated during one run
#[derive(Debug, Default)]
struct Trace {
    states: Vec<EngineState>,
    diagnostics: Vec<Diagnostic>,
}

impl Trace {
    fn enter(&mut self, state: EngineState) {
        tracing::trace!(target: "dsid.engine", state = ?state, "entering state");
        self.states.push(state);
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::NoDmiEvidence => {
                tracing::info!(target: "dsid.engine", "{}", diagnostic)
            }
            _ => tracing::warn!(target: "dsid.engine", "{}", diagnostic),
        }
        self.diagnostics.push(diagnostic);
    }

    fn finish(mut self, result: IdentificationResult) -> IdentificationReport {
        if result.is_disabled() && self.states.last() != Some(&EngineState::Disabled) {
            self.enter(EngineState::Disabled);
        }
        self.enter(EngineState::Terminal);
        tracing::info!(target: "dsid.engine", result = %result, "identification finished");
        IdentificationReport {
            result,
            states: self.states,
            diagnostics: self.diagnostics,
        }
    }
}

/// Outcome of the strict (non-network) part of identification
#[derive(Debug, Clone, PartialEq, Eq)]
enum Strict {
    Decided(IdentificationResult),
    /// DMI is present but nothing matched; these may be probed
    Discover(Vec<Datasource>),
}

/// The identification engine.
///
/// Holds only immutable policy; every call evaluates the given snapshot from
/// scratch, so identical snapshots yield identical reports.
pub struct Engine {
    settings: Settings,
    probe: Box<dyn AvailabilityProbe>,
    prober: Option<Arc<dyn MetadataProber>>,
}

impl Engine {
    /// Engine with the evidence-based availability probe and no network
    /// prober. Discovery is reported as disabled until one is attached.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            probe: Box::new(EvidenceProbe),
            prober: None,
        }
    }

    /// Engine wired with the HTTP prober when discovery is enabled
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let prober: Option<Arc<dyn MetadataProber>> = if settings.discovery.enabled {
            Some(Arc::new(HttpMetadataProber::new(&settings.discovery)?))
        } else {
            None
        };
        Ok(Self {
            prober,
            ..Self::new(settings)
        })
    }

    pub fn with_availability_probe(mut self, probe: impl AvailabilityProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_metadata_prober(mut self, prober: Arc<dyn MetadataProber>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Drop the network prober; step 6 then always reports disabled
    pub fn without_discovery(mut self) -> Self {
        self.prober = None;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Identify the datasource for `evidence`
    pub async fn identify(&self, evidence: &EvidenceSnapshot) -> IdentificationReport {
        self.identify_until(evidence, std::future::pending::<()>())
            .await
    }

    /// Identify, giving up with `Disabled` if `cancel` completes first.
    ///
    /// Only network discovery can be interrupted; the strict steps never
    /// block.
    pub async fn identify_until<F>(&self, evidence: &EvidenceSnapshot, cancel: F) -> IdentificationReport
    where
        F: Future<Output = ()>,
    {
        let mut trace = Trace::default();
        let candidates = match self.evaluate_strict(evidence, &mut trace) {
            Strict::Decided(result) => return trace.finish(result),
            Strict::Discover(candidates) => candidates,
        };

        trace.enter(EngineState::CheckLegacyDiscovery);
        let Some(prober) = self.prober.as_ref() else {
            return trace.finish(IdentificationResult::disabled(
                DisabledReason::DiscoveryDisabled,
            ));
        };

        tokio::select! {
            (result, diagnostics) = discover(prober.as_ref(), &candidates) => {
                for diagnostic in diagnostics {
                    trace.report(diagnostic);
                }
                trace.finish(result)
            }
            _ = cancel => {
                tracing::warn!(target: "dsid.engine", "discovery cancelled by supervisor");
                trace.finish(IdentificationResult::disabled(DisabledReason::Cancelled))
            }
        }
    }

    /// Steps 1 through 5; pure over the snapshot
    fn evaluate_strict(&self, evidence: &EvidenceSnapshot, trace: &mut Trace) -> Strict {
        trace.enter(EngineState::Start);

        trace.enter(EngineState::CheckCmdlineOverride);
        if let Some(ds) = cmdline_override(evidence, trace) {
            return Strict::Decided(IdentificationResult::selected(
                ds,
                DiscoveryKind::CmdlineForced,
                true,
            ));
        }

        trace.enter(EngineState::CheckPolicy);
        if self.settings.policy == Policy::Disabled {
            return Strict::Decided(IdentificationResult::disabled(DisabledReason::Policy));
        }

        trace.enter(EngineState::CheckDmi);
        if evidence.has_dmi() {
            if let Some(ds) = dmi_match(evidence, trace) {
                return Strict::Decided(IdentificationResult::selected(
                    ds,
                    DiscoveryKind::DmiStrict,
                    false,
                ));
            }
        } else {
            trace.report(Diagnostic::NoDmiEvidence);
        }

        trace.enter(EngineState::CheckStaticConfig);
        let configured = known_static_list(evidence, trace);
        if let Some(result) = self.static_config_match(&configured, evidence) {
            return Strict::Decided(result);
        }

        if !evidence.has_dmi() {
            trace.enter(EngineState::Disabled);
            return Strict::Decided(IdentificationResult::disabled(
                DisabledReason::NoDmiEvidence,
            ));
        }

        if !self.settings.discovery.enabled {
            return Strict::Decided(IdentificationResult::disabled(
                DisabledReason::DiscoveryDisabled,
            ));
        }

        Strict::Discover(self.discovery_candidates(&configured))
    }

    /// Static list rules: a sole entry is forced only if available, a sole
    /// `None` always wins, a longer list yields its first available entry.
    fn static_config_match(
        &self,
        configured: &[Datasource],
        evidence: &EvidenceSnapshot,
    ) -> Option<IdentificationResult> {
        match configured {
            [] => None,
            [Datasource::None] => Some(IdentificationResult::selected(
                Datasource::None,
                DiscoveryKind::NoneFallback,
                true,
            )),
            [only] => self.probe.is_available(*only, evidence).then(|| {
                IdentificationResult::selected(*only, DiscoveryKind::StaticConfig, true)
            }),
            many => many.iter().find_map(|ds| match ds {
                Datasource::None => Some(IdentificationResult::selected(
                    Datasource::None,
                    DiscoveryKind::NoneFallback,
                    false,
                )),
                ds if self.probe.is_available(*ds, evidence) => Some(
                    IdentificationResult::selected(*ds, DiscoveryKind::StaticConfig, false),
                ),
                _ => None,
            }),
        }
    }

    /// Datasources to probe over the network.
    ///
    /// A non-empty static list restricts discovery to the datasources it
    /// names, in list order.
    fn discovery_candidates(&self, configured: &[Datasource]) -> Vec<Datasource> {
        let allowed = &self.settings.discovery.datasources;
        if configured.is_empty() {
            allowed.clone()
        } else {
            configured
                .iter()
                .copied()
                .filter(|ds| allowed.contains(ds))
                .collect()
        }
    }
}

/// Last valid `ds=` override wins; unknown names are reported and skipped
fn cmdline_override(evidence: &EvidenceSnapshot, trace: &mut Trace) -> Option<Datasource> {
    let mut selected = None;
    for name in evidence.kernel_cmdline.datasource_overrides() {
        match name.parse::<Datasource>() {
            Ok(ds) => selected = Some(ds),
            Err(_) => trace.report(Diagnostic::UnrecognizedOverride {
                source: OverrideSource::KernelCmdline,
                name: name.to_string(),
            }),
        }
    }
    selected
}

fn dmi_match(evidence: &EvidenceSnapshot, trace: &mut Trace) -> Option<Datasource> {
    let matches = signature::matching(evidence);
    let selected = *matches.first()?;
    if matches.len() > 1 {
        trace.report(Diagnostic::AmbiguousDmiMatch {
            matches,
            selected,
        });
    }
    Some(selected)
}

/// Known datasources of the static list, deduplicated, in configured order
fn known_static_list(evidence: &EvidenceSnapshot, trace: &mut Trace) -> Vec<Datasource> {
    let mut known = Vec::with_capacity(evidence.static_config.len());
    for name in &evidence.static_config {
        match name.parse::<Datasource>() {
            Ok(ds) if !known.contains(&ds) => known.push(ds),
            Ok(_) => {}
            Err(_) => trace.report(Diagnostic::UnrecognizedOverride {
                source: OverrideSource::StaticConfig,
                name: name.clone(),
            }),
        }
    }
    known
}

async fn discover(
    prober: &dyn MetadataProber,
    candidates: &[Datasource],
) -> (IdentificationResult, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    for ds in candidates {
        tracing::debug!(target: "dsid.engine", datasource = %ds, "probing metadata service");
        match prober.probe(*ds).await {
            ProbeOutcome::Found => {
                let result =
                    IdentificationResult::selected(*ds, DiscoveryKind::NetworkDiscovery, false);
                return (result, diagnostics);
            }
            ProbeOutcome::TimedOut => {
                diagnostics.push(Diagnostic::DiscoveryTimeout { datasource: *ds });
            }
            ProbeOutcome::NotFound => {}
        }
    }
    (
        IdentificationResult::disabled(DisabledReason::NothingDiscovered),
        diagnostics,
    )
}
