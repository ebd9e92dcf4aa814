// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Known datasource identifiers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DsidError;

/// A platform/cloud integration that can supply boot-time configuration.
///
/// Variant names are the canonical, case-sensitive names used in
/// `datasource_list` and in the `ds=` kernel command line token.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Datasource {
    NoCloud,
    ConfigDrive,
    OpenStack,
    Ec2,
    GCE,
    Azure,
    DigitalOcean,
    Oracle,
    Hetzner,
    Vultr,
    AliYun,
    Scaleway,
    Exoscale,
    LXD,
    /// Pseudo-datasource: boot continues with no platform metadata.
    None,
}

/// Tie-break order used when several DMI signatures match at once.
///
/// Earlier entries win. Datasources whose signature is an explicit operator
/// marker (LXD board name, NoCloud serial) come first, then single-vendor
/// clouds with unique asset tags or vendor strings, then the generic
/// Ec2/OpenStack signatures that other clouds imitate.
pub const PRECEDENCE: [Datasource; 15] = [
    Datasource::LXD,
    Datasource::NoCloud,
    Datasource::Azure,
    Datasource::Oracle,
    Datasource::GCE,
    Datasource::AliYun,
    Datasource::DigitalOcean,
    Datasource::Hetzner,
    Datasource::Vultr,
    Datasource::Scaleway,
    Datasource::Exoscale,
    Datasource::Ec2,
    Datasource::OpenStack,
    Datasource::ConfigDrive,
    Datasource::None,
];

impl Datasource {
    /// Every known datasource, in declaration order
    pub const ALL: [Datasource; 15] = [
        Datasource::NoCloud,
        Datasource::ConfigDrive,
        Datasource::OpenStack,
        Datasource::Ec2,
        Datasource::GCE,
        Datasource::Azure,
        Datasource::DigitalOcean,
        Datasource::Oracle,
        Datasource::Hetzner,
        Datasource::Vultr,
        Datasource::AliYun,
        Datasource::Scaleway,
        Datasource::Exoscale,
        Datasource::LXD,
        Datasource::None,
    ];

    /// Canonical name as written in configuration
    pub fn name(&self) -> &'static str {
        match self {
            Datasource::NoCloud => "NoCloud",
            Datasource::ConfigDrive => "ConfigDrive",
            Datasource::OpenStack => "OpenStack",
            Datasource::Ec2 => "Ec2",
            Datasource::GCE => "GCE",
            Datasource::Azure => "Azure",
            Datasource::DigitalOcean => "DigitalOcean",
            Datasource::Oracle => "Oracle",
            Datasource::Hetzner => "Hetzner",
            Datasource::Vultr => "Vultr",
            Datasource::AliYun => "AliYun",
            Datasource::Scaleway => "Scaleway",
            Datasource::Exoscale => "Exoscale",
            Datasource::LXD => "LXD",
            Datasource::None => "None",
        }
    }

    /// Position in [`PRECEDENCE`]; lower wins
    pub fn precedence(&self) -> usize {
        PRECEDENCE
            .iter()
            .position(|ds| ds == self)
            .unwrap_or(PRECEDENCE.len())
    }

    /// Whether a link-local metadata service can reveal this datasource
    pub fn is_network_discoverable(&self) -> bool {
        matches!(
            self,
            Datasource::OpenStack | Datasource::Ec2 | Datasource::GCE | Datasource::DigitalOcean
        )
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Datasource::NoCloud => "Local seed directory or cidata filesystem",
            Datasource::ConfigDrive => "OpenStack config-2 drive",
            Datasource::OpenStack => "OpenStack metadata service",
            Datasource::Ec2 => "Amazon EC2 and compatible metadata services",
            Datasource::GCE => "Google Compute Engine",
            Datasource::Azure => "Microsoft Azure",
            Datasource::DigitalOcean => "DigitalOcean droplet metadata",
            Datasource::Oracle => "Oracle Cloud Infrastructure",
            Datasource::Hetzner => "Hetzner Cloud",
            Datasource::Vultr => "Vultr",
            Datasource::AliYun => "Alibaba Cloud ECS",
            Datasource::Scaleway => "Scaleway",
            Datasource::Exoscale => "Exoscale",
            Datasource::LXD => "LXD container or virtual machine",
            Datasource::None => "No datasource; configure from defaults only",
        }
    }
}

impl FromStr for Datasource {
    type Err = DsidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Datasource::ALL
            .iter()
            .copied()
            .find(|ds| ds.name() == s)
            .ok_or_else(|| DsidError::UnknownDatasource(s.to_string()))
    }
}

impl std::fmt::Display for Datasource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
