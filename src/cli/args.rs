// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for dsid.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dsid - identify the cloud datasource at boot
#[derive(Parser, Debug)]
#[command(name = "dsid")]
#[command(version, about = "Identify the cloud datasource this system runs on")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Filesystem root evidence is read from
    #[arg(long, global = true, default_value = "/")]
    pub root: PathBuf,

    /// Settings file (defaults to <root>/etc/cloud/ds-identify.cfg)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identify the datasource (default when no command given)
    Identify(IdentifyArgs),

    /// Show the collected evidence
    Evidence,

    /// List known datasources in precedence order
    #[command(alias = "ls")]
    List,
}

/// Arguments for the identify subcommand
#[derive(clap::Args, Debug, Default)]
pub struct IdentifyArgs {
    /// Write the selected datasource as a cloud config drop-in
    #[arg(short, long)]
    pub write: Option<PathBuf>,

    /// Skip link-local network discovery
    #[arg(long)]
    pub no_discovery: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_no_command() {
        let cli = Cli::parse_from(["dsid"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.root, PathBuf::from("/"));
        assert!(matches!(cli.format, OutputFormat::Text));
    }

    #[test]
    fn test_cli_verbose_multiple() {
        let cli = Cli::parse_from(["dsid", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_root_and_config() {
        let cli = Cli::parse_from([
            "dsid",
            "--root",
            "/tmp/fake",
            "--config",
            "/etc/dsid.cfg",
        ]);
        assert_eq!(cli.root, PathBuf::from("/tmp/fake"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/dsid.cfg")));
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["dsid", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_identify_args() {
        let cli = Cli::parse_from([
            "dsid",
            "identify",
            "--write",
            "/run/cloud-init/cloud.cfg",
            "--no-discovery",
        ]);
        match cli.command {
            Some(Commands::Identify(args)) => {
                assert_eq!(args.write, Some(PathBuf::from("/run/cloud-init/cloud.cfg")));
                assert!(args.no_discovery);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dsid", "evidence", "--root", "/x", "--format", "json"]);
        assert!(matches!(cli.command, Some(Commands::Evidence)));
        assert_eq!(cli.root, PathBuf::from("/x"));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_list_alias() {
        let cli = Cli::parse_from(["dsid", "ls"]);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["dsid", "--format", "yaml"]).is_err());
    }
}
