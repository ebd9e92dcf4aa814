// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use mockall::mock;
use mockall::predicate::eq;
use proptest::prelude::*;
use proptest::sample::select;

use dsid::config::Settings;
use dsid::datasource::{AvailabilityProbe, Datasource};
use dsid::engine::{DisabledReason, DiscoveryKind, Engine, EngineState, IdentificationResult};
use dsid::evidence::{DmiField, EvidenceSnapshot};

mock! {
    Probe {}
    impl AvailabilityProbe for Probe {
        fn is_available(&self, datasource: Datasource, evidence: &EvidenceSnapshot) -> bool;
    }
}

/// One DMI value per datasource that carries a signature
const CANONICAL_DMI: &[(Datasource, DmiField, &str)] = &[
    (Datasource::LXD, DmiField::BoardName, "LXD"),
    (Datasource::NoCloud, DmiField::ProductSerial, "ds=nocloud;s=http://10.0.2.2/"),
    (Datasource::Azure, DmiField::ChassisAssetTag, "7783-7084-3265-9085-8269-3286-77"),
    (Datasource::Oracle, DmiField::ChassisAssetTag, "OracleCloud.com"),
    (Datasource::GCE, DmiField::ProductName, "Google Compute Engine"),
    (Datasource::AliYun, DmiField::ProductName, "Alibaba Cloud ECS"),
    (Datasource::DigitalOcean, DmiField::SysVendor, "DigitalOcean"),
    (Datasource::Hetzner, DmiField::SysVendor, "Hetzner"),
    (Datasource::Vultr, DmiField::SysVendor, "Vultr"),
    (Datasource::Scaleway, DmiField::SysVendor, "Scaleway"),
    (Datasource::Exoscale, DmiField::ProductName, "Exoscale Compute"),
    (Datasource::Ec2, DmiField::SysVendor, "Amazon EC2"),
    (Datasource::OpenStack, DmiField::ProductName, "OpenStack Nova"),
];

fn identify(engine: &Engine, evidence: &EvidenceSnapshot) -> IdentificationResult {
    tokio_test::block_on(engine.identify(evidence)).result
}

fn arb_datasource() -> impl Strategy<Value = Datasource> {
    select(Datasource::ALL.to_vec())
}

fn arb_list_entry() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_datasource().prop_map(|ds| ds.name().to_string()),
        Just("Bogus".to_string()),
        Just("openstack".to_string()),
    ]
}

fn arb_dmi() -> impl Strategy<Value = Option<Vec<(DmiField, String)>>> {
    prop::option::of(prop::collection::vec(
        (select(DmiField::ALL.to_vec()), "[A-Za-z0-9 .-]{0,24}"),
        0..4,
    ))
}

fn arb_snapshot() -> impl Strategy<Value = EvidenceSnapshot> {
    (
        arb_dmi(),
        prop::collection::vec(arb_list_entry(), 0..5),
        prop::collection::vec("[a-z]{1,8}(=[a-z0-9]{1,6})?", 0..5),
        prop::collection::btree_set(select(vec!["config-2", "cidata", "rootfs"]), 0..3),
    )
        .prop_map(|(dmi, list, noise, labels)| {
            let mut evidence = EvidenceSnapshot::new()
                .with_static_config(list)
                .with_cmdline(&noise.join(" "));
            if let Some(fields) = dmi {
                evidence = evidence.with_dmi();
                for (field, value) in fields {
                    evidence = evidence.with_dmi_field(field, value);
                }
            }
            for label in labels {
                evidence = evidence.with_fs_label(label);
            }
            evidence
        })
}

proptest! {
    #[test]
    fn cmdline_override_always_wins(evidence in arb_snapshot(), ds in arb_datasource()) {
        let mut tokens = evidence.kernel_cmdline.tokens().to_vec();
        tokens.push(format!("ds={}", ds));
        let evidence = evidence.with_cmdline(&tokens.join(" "));

        let result = identify(&Engine::new(Settings::default()), &evidence);
        prop_assert_eq!(
            result,
            IdentificationResult::selected(ds, DiscoveryKind::CmdlineForced, true)
        );
    }

    #[test]
    fn single_dmi_signature_is_strict(
        index in 0..CANONICAL_DMI.len(),
        list in prop::collection::vec(arb_list_entry(), 0..5),
    ) {
        let (ds, field, value) = CANONICAL_DMI[index];
        let evidence = EvidenceSnapshot::new()
            .with_dmi_field(field, value)
            .with_static_config(list);

        let result = identify(&Engine::new(Settings::default()), &evidence);
        prop_assert_eq!(
            result,
            IdentificationResult::selected(ds, DiscoveryKind::DmiStrict, false)
        );
    }

    #[test]
    fn no_dmi_and_empty_list_is_disabled(noise in prop::collection::vec("[a-z]{1,8}", 0..5)) {
        let evidence = EvidenceSnapshot::new().with_cmdline(&noise.join(" "));
        let report = tokio_test::block_on(Engine::new(Settings::default()).identify(&evidence));

        prop_assert_eq!(
            report.result,
            IdentificationResult::disabled(DisabledReason::NoDmiEvidence)
        );
        prop_assert!(!report.states.contains(&EngineState::CheckLegacyDiscovery));
    }

    #[test]
    fn identification_is_deterministic(evidence in arb_snapshot()) {
        let engine = Engine::new(Settings::default());
        let first = tokio_test::block_on(engine.identify(&evidence));
        let second = tokio_test::block_on(engine.identify(&evidence));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn none_is_never_invented(evidence in arb_snapshot()) {
        let listed_none = evidence.static_config.iter().any(|name| name == "None");
        let result = identify(&Engine::new(Settings::default()), &evidence);
        if result.datasource() == Some(Datasource::None) {
            let candidate = result.candidate().unwrap();
            prop_assert!(
                listed_none || candidate.discovery == DiscoveryKind::CmdlineForced,
                "None selected without being listed: {:?}",
                result
            );
        }
    }
}

#[test]
fn single_unavailable_entry_is_not_auto_selected() {
    let mut probe = MockProbe::new();
    probe
        .expect_is_available()
        .withf(|ds, _| *ds == Datasource::OpenStack)
        .times(1)
        .return_const(false);

    let engine = Engine::new(Settings::default()).with_availability_probe(probe);
    let evidence = EvidenceSnapshot::new().with_static_config(["OpenStack"]);
    assert_eq!(
        identify(&engine, &evidence),
        IdentificationResult::disabled(DisabledReason::NoDmiEvidence)
    );
}

#[test]
fn single_available_entry_is_forced() {
    let mut probe = MockProbe::new();
    probe
        .expect_is_available()
        .with(eq(Datasource::OpenStack), mockall::predicate::always())
        .times(1)
        .return_const(true);

    let engine = Engine::new(Settings::default()).with_availability_probe(probe);
    let evidence = EvidenceSnapshot::new().with_static_config(["OpenStack"]);
    assert_eq!(
        identify(&engine, &evidence),
        IdentificationResult::selected(Datasource::OpenStack, DiscoveryKind::StaticConfig, true)
    );
}

#[test]
fn sole_none_needs_no_probe() {
    let mut probe = MockProbe::new();
    probe.expect_is_available().never();

    let engine = Engine::new(Settings::default()).with_availability_probe(probe);
    let evidence = EvidenceSnapshot::new().with_static_config(["None"]);
    assert_eq!(
        identify(&engine, &evidence),
        IdentificationResult::selected(Datasource::None, DiscoveryKind::NoneFallback, true)
    );
}

#[test]
fn listed_none_is_fallback_after_failed_probe() {
    let mut probe = MockProbe::new();
    probe
        .expect_is_available()
        .withf(|ds, _| *ds == Datasource::OpenStack)
        .times(1)
        .return_const(false);

    let engine = Engine::new(Settings::default()).with_availability_probe(probe);
    let evidence = EvidenceSnapshot::new().with_static_config(["OpenStack", "None"]);
    assert_eq!(
        identify(&engine, &evidence),
        IdentificationResult::selected(Datasource::None, DiscoveryKind::NoneFallback, false)
    );
}

#[test]
fn dmi_match_skips_availability_probes() {
    let mut probe = MockProbe::new();
    probe.expect_is_available().never();

    let engine = Engine::new(Settings::default()).with_availability_probe(probe);
    let evidence = EvidenceSnapshot::new()
        .with_dmi_field(DmiField::SysVendor, "Scaleway")
        .with_static_config(["OpenStack", "None"]);
    assert_eq!(
        identify(&engine, &evidence).datasource(),
        Some(Datasource::Scaleway)
    );
}

#[test]
fn states_follow_strict_order() {
    let evidence = EvidenceSnapshot::new().with_static_config(["None"]);
    let report = tokio_test::block_on(Engine::new(Settings::default()).identify(&evidence));
    assert_eq!(
        report.states,
        vec![
            EngineState::Start,
            EngineState::CheckCmdlineOverride,
            EngineState::CheckPolicy,
            EngineState::CheckDmi,
            EngineState::CheckStaticConfig,
            EngineState::Terminal,
        ]
    );
}
