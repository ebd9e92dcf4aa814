// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Persisting the identification result
//!
//! The selected datasource is handed to the configuration stage as a
//! one-entry `datasource_list` in a cloud config drop-in.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::engine::IdentificationResult;
use crate::error::{DsidError, Result};

/// Render the drop-in for `result`, or `None` when nothing is selected
pub fn render_cloud_cfg(result: &IdentificationResult) -> Option<String> {
    let candidate = result.candidate()?;
    Some(format!(
        "# generated by dsid {} at {}\n# {}\ndatasource_list: [{}]\n",
        env!("CARGO_PKG_VERSION"),
        Utc::now().to_rfc3339(),
        result,
        candidate.datasource.name()
    ))
}

/// Write the drop-in for `result` to `path`.
///
/// The file is replaced atomically. A disabled result writes nothing and
/// removes any file left by a previous boot. Returns whether a file was
/// written.
pub fn write_cloud_cfg(path: &Path, result: &IdentificationResult) -> Result<bool> {
    let Some(content) = render_cloud_cfg(result) else {
        if path.exists() {
            fs::remove_file(path)?;
            tracing::info!(target: "dsid.output", path = %path.display(), "removed stale datasource config");
        }
        return Ok(false);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path)?;
    let written = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    tracing::info!(target: "dsid.output", path = %path.display(), result = %result, "wrote datasource config");
    Ok(true)
}

/// Sibling temp file so the final rename stays on one filesystem
fn temp_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DsidError::InvalidInput(format!("not a file path: {}", path.display())))?;
    Ok(path.with_file_name(format!(".{}.{}.tmp", name, std::process::id())))
}
