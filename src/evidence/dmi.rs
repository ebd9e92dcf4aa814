// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! DMI (SMBIOS) identification fields

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Path of the DMI attribute directory, relative to the filesystem root
pub const DMI_DIR: &str = "sys/class/dmi/id";

/// DMI attributes the platform signatures look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DmiField {
    SysVendor,
    ProductName,
    ProductSerial,
    ProductUuid,
    ProductVersion,
    ChassisAssetTag,
    BoardName,
    BoardVendor,
}

impl DmiField {
    pub const ALL: [DmiField; 8] = [
        DmiField::SysVendor,
        DmiField::ProductName,
        DmiField::ProductSerial,
        DmiField::ProductUuid,
        DmiField::ProductVersion,
        DmiField::ChassisAssetTag,
        DmiField::BoardName,
        DmiField::BoardVendor,
    ];

    /// File name under `/sys/class/dmi/id`
    pub fn file_name(&self) -> &'static str {
        match self {
            DmiField::SysVendor => "sys_vendor",
            DmiField::ProductName => "product_name",
            DmiField::ProductSerial => "product_serial",
            DmiField::ProductUuid => "product_uuid",
            DmiField::ProductVersion => "product_version",
            DmiField::ChassisAssetTag => "chassis_asset_tag",
            DmiField::BoardName => "board_name",
            DmiField::BoardVendor => "board_vendor",
        }
    }
}

impl std::fmt::Display for DmiField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// DMI attribute values as exposed by the firmware.
///
/// An empty map is still "DMI present": the platform exposes the interface
/// but reported nothing useful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DmiFields(BTreeMap<DmiField, String>);

impl DmiFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: DmiField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: DmiField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn with(mut self, field: DmiField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DmiField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Read every known field from `<root>/sys/class/dmi/id`.
    ///
    /// Returns `None` when the directory does not exist, which is how
    /// architectures without DMI present themselves. Unreadable attributes
    /// (product_serial is root-only on most kernels) are skipped.
    pub fn read(root: &Path) -> Option<Self> {
        let dir = root.join(DMI_DIR);
        if !dir.is_dir() {
            tracing::debug!(target: "dsid.evidence", path = %dir.display(), "no DMI directory");
            return None;
        }

        let mut fields = DmiFields::new();
        for field in DmiField::ALL {
            let path = dir.join(field.file_name());
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let value = content.trim();
                    if !value.is_empty() {
                        fields.insert(field, value);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::debug!(
                        target: "dsid.evidence",
                        field = %field,
                        error = %e,
                        "unreadable DMI attribute"
                    );
                }
            }
        }
        Some(fields)
    }
}
