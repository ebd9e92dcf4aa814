// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Platform signatures: which firmware strings identify which datasource

use super::kind::{Datasource, PRECEDENCE};
use crate::evidence::{DmiField, EvidenceSnapshot};

/// How a rule compares an evidence value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
    /// ASCII case-insensitive prefix (UUIDs come in either case)
    PrefixIgnoreCase(&'static str),
    Suffix(&'static str),
    Contains(&'static str),
}

impl Pattern {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(p) => value == *p,
            Pattern::Prefix(p) => value.starts_with(p),
            Pattern::PrefixIgnoreCase(p) => value
                .get(..p.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(p)),
            Pattern::Suffix(p) => value.ends_with(p),
            Pattern::Contains(p) => value.contains(p),
        }
    }
}

/// Where a rule reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Dmi(DmiField),
    HypervisorUuid,
}

/// One identifying string; a datasource matches if any of its rules match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub source: Source,
    pub pattern: Pattern,
}

impl Rule {
    const fn dmi(field: DmiField, pattern: Pattern) -> Self {
        Self {
            source: Source::Dmi(field),
            pattern,
        }
    }

    pub fn matches(&self, evidence: &EvidenceSnapshot) -> bool {
        let value = match self.source {
            Source::Dmi(field) => evidence.dmi_field(field),
            Source::HypervisorUuid => evidence.hypervisor_uuid.as_deref(),
        };
        value.is_some_and(|v| self.pattern.matches(v))
    }
}

const EC2: &[Rule] = &[
    Rule::dmi(DmiField::SysVendor, Pattern::Exact("Amazon EC2")),
    Rule::dmi(DmiField::ProductSerial, Pattern::PrefixIgnoreCase("ec2")),
    Rule::dmi(DmiField::ProductUuid, Pattern::PrefixIgnoreCase("ec2")),
    // Brightbox runs an EC2-compatible metadata service
    Rule::dmi(DmiField::ProductSerial, Pattern::Suffix(".brightbox.com")),
    Rule {
        source: Source::HypervisorUuid,
        pattern: Pattern::PrefixIgnoreCase("ec2"),
    },
];

const GCE: &[Rule] = &[
    Rule::dmi(DmiField::ProductName, Pattern::Exact("Google Compute Engine")),
    Rule::dmi(DmiField::ProductName, Pattern::Exact("Google")),
    Rule::dmi(DmiField::ProductSerial, Pattern::Prefix("GoogleCloud-")),
];

const AZURE: &[Rule] = &[Rule::dmi(
    DmiField::ChassisAssetTag,
    Pattern::Exact("7783-7084-3265-9085-8269-3286-77"),
)];

const DIGITAL_OCEAN: &[Rule] = &[Rule::dmi(DmiField::SysVendor, Pattern::Exact("DigitalOcean"))];

const ORACLE: &[Rule] = &[Rule::dmi(
    DmiField::ChassisAssetTag,
    Pattern::Exact("OracleCloud.com"),
)];

const HETZNER: &[Rule] = &[Rule::dmi(DmiField::SysVendor, Pattern::Exact("Hetzner"))];

const VULTR: &[Rule] = &[Rule::dmi(DmiField::SysVendor, Pattern::Exact("Vultr"))];

const ALIYUN: &[Rule] = &[Rule::dmi(
    DmiField::ProductName,
    Pattern::Exact("Alibaba Cloud ECS"),
)];

const SCALEWAY: &[Rule] = &[Rule::dmi(DmiField::SysVendor, Pattern::Exact("Scaleway"))];

const EXOSCALE: &[Rule] = &[Rule::dmi(DmiField::ProductName, Pattern::Prefix("Exoscale"))];

const OPENSTACK: &[Rule] = &[
    Rule::dmi(DmiField::ProductName, Pattern::Exact("OpenStack Nova")),
    Rule::dmi(DmiField::ProductName, Pattern::Exact("OpenStack Compute")),
    Rule::dmi(DmiField::ChassisAssetTag, Pattern::Exact("OpenTelekomCloud")),
    Rule::dmi(DmiField::ChassisAssetTag, Pattern::Exact("HUAWEICLOUD")),
    Rule::dmi(DmiField::ChassisAssetTag, Pattern::Exact("SAP CCloud VM")),
];

const LXD: &[Rule] = &[Rule::dmi(DmiField::BoardName, Pattern::Exact("LXD"))];

const NOCLOUD: &[Rule] = &[
    Rule::dmi(DmiField::ProductSerial, Pattern::Contains("ds=nocloud")),
    Rule::dmi(DmiField::ProductSerial, Pattern::Contains("ds=NoCloud")),
];

/// Identifying rules for a datasource; empty for datasources that have no
/// platform signature (ConfigDrive, None)
pub fn rules(datasource: Datasource) -> &'static [Rule] {
    match datasource {
        Datasource::Ec2 => EC2,
        Datasource::GCE => GCE,
        Datasource::Azure => AZURE,
        Datasource::DigitalOcean => DIGITAL_OCEAN,
        Datasource::Oracle => ORACLE,
        Datasource::Hetzner => HETZNER,
        Datasource::Vultr => VULTR,
        Datasource::AliYun => ALIYUN,
        Datasource::Scaleway => SCALEWAY,
        Datasource::Exoscale => EXOSCALE,
        Datasource::OpenStack => OPENSTACK,
        Datasource::LXD => LXD,
        Datasource::NoCloud => NOCLOUD,
        Datasource::ConfigDrive | Datasource::None => &[],
    }
}

/// Whether any rule of `datasource` matches the evidence
pub fn matches(datasource: Datasource, evidence: &EvidenceSnapshot) -> bool {
    rules(datasource).iter().any(|rule| rule.matches(evidence))
}

/// All datasources whose signature matches, ordered by [`PRECEDENCE`]
pub fn matching(evidence: &EvidenceSnapshot) -> Vec<Datasource> {
    PRECEDENCE
        .iter()
        .copied()
        .filter(|ds| matches(*ds, evidence))
        .collect()
}
