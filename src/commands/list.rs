// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! List command

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::datasource::{Datasource, PRECEDENCE};
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasourceInfo {
    name: &'static str,
    precedence: usize,
    network_discoverable: bool,
    description: &'static str,
}

impl From<Datasource> for DatasourceInfo {
    fn from(ds: Datasource) -> Self {
        Self {
            name: ds.name(),
            precedence: ds.precedence(),
            network_discoverable: ds.is_network_discoverable(),
            description: ds.description(),
        }
    }
}

/// Execute the list command
pub fn execute(format: OutputFormat) -> Result<()> {
    println!("{}", render(format)?);
    Ok(())
}

/// Known datasources in precedence order
pub fn render(format: OutputFormat) -> Result<String> {
    let infos: Vec<DatasourceInfo> = PRECEDENCE.iter().copied().map(Into::into).collect();

    if matches!(format, OutputFormat::Json) {
        return Ok(serde_json::to_string_pretty(&infos)?);
    }

    let lines: Vec<String> = infos
        .iter()
        .map(|info| {
            format!(
                "{:>2}. {:<13} {}{}",
                info.precedence + 1,
                info.name,
                info.description,
                if info.network_discoverable {
                    " [discoverable]"
                } else {
                    ""
                }
            )
        })
        .collect();
    Ok(lines.join("\n"))
}
