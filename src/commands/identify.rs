// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Identify command

use std::path::Path;
use std::time::Duration;

use crate::cli::args::{IdentifyArgs, OutputFormat};
use crate::config::Settings;
use crate::engine::{Engine, IdentificationReport};
use crate::error::Result;
use crate::evidence::{EvidenceCollector, EvidenceSnapshot};
use crate::output;

/// Execute the identify command.
///
/// Collects evidence under `root`, runs the engine and prints the report.
/// Returns the report so the caller can derive an exit status.
pub async fn execute(
    args: &IdentifyArgs,
    root: &Path,
    settings: Settings,
    format: OutputFormat,
) -> Result<IdentificationReport> {
    let evidence = EvidenceCollector::new(root).collect()?;
    let report = run(args, &evidence, settings).await?;

    if let Some(path) = &args.write {
        output::write_cloud_cfg(path, &report.result)?;
    }

    println!("{}", render(&report, format)?);
    Ok(report)
}

/// Run the engine over `evidence`, bounded by the discovery deadline and
/// interruptible with Ctrl-C.
pub async fn run(
    args: &IdentifyArgs,
    evidence: &EvidenceSnapshot,
    settings: Settings,
) -> Result<IdentificationReport> {
    let deadline = discovery_deadline(&settings);
    let mut engine = Engine::from_settings(settings)?;
    if args.no_discovery {
        engine = engine.without_discovery();
    }

    let cancel = async move {
        tokio::select! {
            _ = tokio::time::sleep(deadline) => {
                tracing::warn!(
                    target: "dsid.engine",
                    deadline_ms = deadline.as_millis() as u64,
                    "discovery deadline reached"
                );
            }
            signal = tokio::signal::ctrl_c() => {
                if signal.is_err() {
                    // No signal handler; rely on the deadline alone
                    std::future::pending::<()>().await;
                }
            }
        }
    };

    Ok(engine.identify_until(evidence, cancel).await)
}

/// Worst case for probing every configured discovery datasource
fn discovery_deadline(settings: &Settings) -> Duration {
    let probes = settings.discovery.datasources.len().max(1) as u64;
    Duration::from_millis(settings.discovery_budget_ms().saturating_mul(probes))
}

/// Render a report in the requested format
pub fn render(report: &IdentificationReport, format: OutputFormat) -> Result<String> {
    if matches!(format, OutputFormat::Json) {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut out = String::new();
    match report.result.candidate() {
        Some(candidate) => {
            out.push_str(&format!("datasource: {}\n", candidate.datasource));
            out.push_str(&format!("discovery:  {}\n", candidate.discovery));
            out.push_str(&format!(
                "forced:     {}\n",
                if candidate.explicitly_forced { "yes" } else { "no" }
            ));
        }
        None => out.push_str(&format!("{}\n", report.result)),
    }

    for diagnostic in &report.diagnostics {
        out.push_str(&format!("note: {}\n", diagnostic));
    }

    Ok(out.trim_end().to_string())
}
