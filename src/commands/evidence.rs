// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Evidence command

use std::path::Path;

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::evidence::{DmiField, EvidenceCollector, EvidenceSnapshot};

/// Execute the evidence command
pub fn execute(root: &Path, format: OutputFormat) -> Result<()> {
    let evidence = EvidenceCollector::new(root).collect()?;
    println!("{}", render(&evidence, format)?);
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let items: Vec<&str> = items.into_iter().map(String::as_str).collect();
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// Render a snapshot in the requested format
pub fn render(evidence: &EvidenceSnapshot, format: OutputFormat) -> Result<String> {
    if matches!(format, OutputFormat::Json) {
        return Ok(serde_json::to_string_pretty(evidence)?);
    }

    let mut out = String::new();
    out.push_str(&format!("architecture:    {:?}\n", evidence.architecture));

    match &evidence.dmi {
        Some(_) => {
            out.push_str("dmi:\n");
            for field in DmiField::ALL {
                let value = evidence.dmi_field(field).unwrap_or("-");
                out.push_str(&format!("  {:<18} {}\n", field.file_name(), value));
            }
        }
        None => out.push_str("dmi:             (unavailable)\n"),
    }

    out.push_str(&format!(
        "kernel cmdline:  {}\n",
        join(evidence.kernel_cmdline.tokens())
    ));
    out.push_str(&format!(
        "datasource_list: {}\n",
        join(&evidence.static_config)
    ));
    out.push_str(&format!(
        "hypervisor uuid: {}\n",
        evidence.hypervisor_uuid.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("fs labels:       {}\n", join(&evidence.fs_labels)));
    out.push_str(&format!("seed dirs:       {}", join(&evidence.seed_dirs)));

    Ok(out)
}
