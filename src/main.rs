// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! dsid - boot-time datasource identification
//!
//! Entry point for the dsid CLI application.

use clap::Parser;

use dsid::cli::{Cli, Commands, IdentifyArgs};
use dsid::commands;
use dsid::error::Result;

/// Exit status when identification ends disabled
const EXIT_DISABLED: i32 = 1;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays machine-readable
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    if cli.verbose > 0 {
        let level = if cli.verbose > 1 { "trace" } else { "debug" };
        for target in [
            "dsid.engine",
            "dsid.evidence",
            "dsid.datasource",
            "dsid.discovery",
            "dsid.config",
            "dsid.output",
        ] {
            if let Ok(parsed) = format!("{}={}", target, level).parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = commands::load_settings(&cli.root, cli.config.as_deref())?;

    // Dispatch to appropriate command
    match cli.command {
        None => {
            let report =
                commands::identify::execute(&IdentifyArgs::default(), &cli.root, settings, cli.format)
                    .await?;
            if report.result.is_disabled() {
                std::process::exit(EXIT_DISABLED);
            }
        }
        Some(Commands::Identify(args)) => {
            let report =
                commands::identify::execute(&args, &cli.root, settings, cli.format).await?;
            if report.result.is_disabled() {
                std::process::exit(EXIT_DISABLED);
            }
        }
        Some(Commands::Evidence) => {
            commands::evidence::execute(&cli.root, cli.format)?;
        }
        Some(Commands::List) => {
            commands::list::execute(cli.format)?;
        }
    }

    Ok(())
}
