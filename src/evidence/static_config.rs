// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Static `datasource_list` configuration
//!
//! Image builders and administrators drop YAML files into `/etc/cloud`.
//! `cloud.cfg` is read first, then every `cloud.cfg.d/*.cfg` in lexical
//! order; a later file replaces a whole top-level key, lists are never
//! concatenated.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::error::{DsidError, Result};

/// Key holding the ordered datasource names
pub const DATASOURCE_LIST_KEY: &str = "datasource_list";

/// Main configuration file, relative to the filesystem root
pub const CLOUD_CFG: &str = "etc/cloud/cloud.cfg";

/// Drop-in directory, relative to the filesystem root
pub const CLOUD_CFG_D: &str = "etc/cloud/cloud.cfg.d";

/// Configuration files under `root`, in merge order
pub fn config_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let main = root.join(CLOUD_CFG);
    if main.is_file() {
        files.push(main);
    }

    let drop_in = root.join(CLOUD_CFG_D);
    let entries = match std::fs::read_dir(&drop_in) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => {
            tracing::warn!(
                target: "dsid.evidence",
                path = %drop_in.display(),
                error = %e,
                "skipping unreadable drop-in directory"
            );
            return Ok(files);
        }
    };

    let mut drop_ins: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "cfg"))
        .collect();
    drop_ins.sort();
    files.extend(drop_ins);

    Ok(files)
}

/// Parse one configuration file into a mapping.
///
/// An empty file is an empty mapping. Any other non-mapping document is a
/// configuration error.
pub fn parse_config(content: &str, path: &Path) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(content)?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(DsidError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

/// Merge files in order, later files replacing earlier top-level keys.
///
/// Files that cannot be read or parsed are logged and skipped so that one
/// broken drop-in does not hide the rest of the configuration.
pub fn merge_files(paths: &[PathBuf]) -> Result<Mapping> {
    let mut merged = Mapping::new();

    for path in paths {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    target: "dsid.evidence",
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable configuration file"
                );
                continue;
            }
        };
        match parse_config(&content, path) {
            Ok(mapping) => {
                for (key, value) in mapping {
                    merged.insert(key, value);
                }
            }
            Err(e) => {
                tracing::warn!(
                    target: "dsid.evidence",
                    path = %path.display(),
                    error = %e,
                    "skipping unparseable configuration file"
                );
            }
        }
    }

    Ok(merged)
}

/// Extract `datasource_list` exactly as configured.
///
/// Accepts a YAML sequence or a comma-separated string. Entries are never
/// added, removed, or reordered here; non-string entries are rendered as
/// text so the engine can report them as unrecognized.
pub fn datasource_list(config: &Mapping) -> Vec<String> {
    match config.get(DATASOURCE_LIST_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items.iter().map(render_entry).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => vec![render_entry(other)],
    }
}

fn render_entry(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Load the merged `datasource_list` under `root`
pub fn load(root: &Path) -> Result<Vec<String>> {
    let files = config_files(root)?;
    tracing::debug!(
        target: "dsid.evidence",
        files = files.len(),
        "loading static datasource configuration"
    );
    let merged = merge_files(&files)?;
    Ok(datasource_list(&merged))
}
