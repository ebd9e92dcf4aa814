// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Evidence collection from a (possibly fake) filesystem root

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{static_config, CpuArchitecture, DmiFields, EvidenceSnapshot, KernelCmdline};
use crate::error::Result;

/// Kernel command line, relative to the filesystem root
pub const PROC_CMDLINE: &str = "proc/cmdline";

/// Xen hypervisor UUID, relative to the filesystem root
pub const HYPERVISOR_UUID: &str = "sys/hypervisor/uuid";

/// Filesystem label symlinks, relative to the filesystem root
pub const DISK_BY_LABEL: &str = "dev/disk/by-label";

/// Local seed directories, relative to the filesystem root
pub const SEED_DIR: &str = "var/lib/cloud/seed";

/// Reads every piece of evidence the engine consumes.
///
/// All paths are resolved under `root` so the same code runs against `/`
/// at boot and against a prepared directory in tests.
#[derive(Debug, Clone)]
pub struct EvidenceCollector {
    root: PathBuf,
}

impl EvidenceCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_dmi(&self) -> Option<DmiFields> {
        DmiFields::read(&self.root)
    }

    pub fn read_cmdline(&self) -> KernelCmdline {
        self.read_trimmed(PROC_CMDLINE)
            .map(|raw| KernelCmdline::parse(&raw))
            .unwrap_or_default()
    }

    pub fn load_static_config(&self) -> Result<Vec<String>> {
        static_config::load(&self.root)
    }

    pub fn read_hypervisor_uuid(&self) -> Option<String> {
        self.read_trimmed(HYPERVISOR_UUID)
    }

    /// Filesystem labels, as named by `/dev/disk/by-label` entries
    pub fn read_fs_labels(&self) -> BTreeSet<String> {
        self.dir_entry_names(DISK_BY_LABEL)
    }

    /// Seed directories that contain at least a `meta-data` file
    pub fn read_seed_dirs(&self) -> BTreeSet<String> {
        let seed_root = self.root.join(SEED_DIR);
        self.dir_entry_names(SEED_DIR)
            .into_iter()
            .filter(|name| seed_root.join(name).join("meta-data").is_file())
            .collect()
    }

    /// Assemble the full snapshot
    pub fn collect(&self) -> Result<EvidenceSnapshot> {
        let snapshot = EvidenceSnapshot {
            architecture: CpuArchitecture::detect(),
            dmi: self.read_dmi(),
            kernel_cmdline: self.read_cmdline(),
            static_config: self.load_static_config()?,
            hypervisor_uuid: self.read_hypervisor_uuid(),
            fs_labels: self.read_fs_labels(),
            seed_dirs: self.read_seed_dirs(),
        };

        tracing::debug!(
            target: "dsid.evidence",
            root = %self.root.display(),
            architecture = ?snapshot.architecture,
            dmi = snapshot.dmi.is_some(),
            cmdline_tokens = snapshot.kernel_cmdline.tokens().len(),
            datasource_list = ?snapshot.static_config,
            "collected evidence"
        );

        Ok(snapshot)
    }

    fn read_trimmed(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(rel))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn dir_entry_names(&self, rel: &str) -> BTreeSet<String> {
        match std::fs::read_dir(self.root.join(rel)) {
            Ok(entries) => entries
                .flatten()
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => BTreeSet::new(),
        }
    }
}
