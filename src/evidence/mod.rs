// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Platform evidence the identification engine decides from
//!
//! An [`EvidenceSnapshot`] is collected once per boot attempt by
//! [`EvidenceCollector`] and handed to the engine read-only.

pub mod cmdline;
pub mod collector;
pub mod dmi;
pub mod static_config;

pub use cmdline::KernelCmdline;
pub use collector::EvidenceCollector;
pub use dmi::{DmiField, DmiFields};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// CPU architecture classification
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuArchitecture {
    X86_64,
    X86,
    ARM64,
    ARM32,
    PowerPC64,
    S390X,
    RiscV64,
    #[default]
    Other,
}

impl CpuArchitecture {
    /// Detect the current CPU architecture
    pub fn detect() -> Self {
        match std::env::consts::ARCH {
            "x86_64" | "amd64" => CpuArchitecture::X86_64,
            "x86" => CpuArchitecture::X86,
            "aarch64" | "arm64" => CpuArchitecture::ARM64,
            "arm" | "armv7" => CpuArchitecture::ARM32,
            "powerpc64" => CpuArchitecture::PowerPC64,
            "s390x" => CpuArchitecture::S390X,
            "riscv64" => CpuArchitecture::RiscV64,
            _ => CpuArchitecture::Other,
        }
    }
}

/// Everything known about the platform at identification time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSnapshot {
    /// Informational; DMI availability is decided by `dmi` alone
    pub architecture: CpuArchitecture,

    /// `None` when the platform exposes no DMI interface
    pub dmi: Option<DmiFields>,

    pub kernel_cmdline: KernelCmdline,

    /// Merged `datasource_list`, exactly as configured
    pub static_config: Vec<String>,

    /// `/sys/hypervisor/uuid` on Xen guests
    pub hypervisor_uuid: Option<String>,

    /// Labels of attached filesystems
    pub fs_labels: BTreeSet<String>,

    /// Names of populated seed directories under `/var/lib/cloud/seed`
    pub seed_dirs: BTreeSet<String>,
}

impl EvidenceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_dmi(&self) -> bool {
        self.dmi.is_some()
    }

    /// Value of a DMI field, if DMI is present and the field was readable
    pub fn dmi_field(&self, field: DmiField) -> Option<&str> {
        self.dmi.as_ref().and_then(|dmi| dmi.get(field))
    }

    /// Mark DMI as present (with no fields yet)
    pub fn with_dmi(mut self) -> Self {
        self.dmi.get_or_insert_with(DmiFields::new);
        self
    }

    /// Set a DMI field, marking DMI as present
    pub fn with_dmi_field(mut self, field: DmiField, value: impl Into<String>) -> Self {
        self.dmi
            .get_or_insert_with(DmiFields::new)
            .insert(field, value);
        self
    }

    pub fn with_cmdline(mut self, raw: &str) -> Self {
        self.kernel_cmdline = KernelCmdline::parse(raw);
        self
    }

    pub fn with_static_config<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_config = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hypervisor_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.hypervisor_uuid = Some(uuid.into());
        self
    }

    pub fn with_fs_label(mut self, label: impl Into<String>) -> Self {
        self.fs_labels.insert(label.into());
        self
    }

    pub fn with_seed_dir(mut self, name: impl Into<String>) -> Self {
        self.seed_dirs.insert(name.into());
        self
    }
}
