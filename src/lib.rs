// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! dsid - boot-time cloud datasource identification.
//!
//! Decides, early in boot and before the network is configured, which
//! datasource the system runs on, or that instance configuration should be
//! disabled.
//!
//! Architecture highlights:
//! - `evidence`: DMI, kernel command line, static config and other platform
//!   evidence, collected once into an immutable snapshot
//! - `datasource`: the datasource catalogue, DMI signatures and availability
//!   probes
//! - `engine`: the single-pass identification state machine
//! - `discovery`: bounded link-local metadata probing
//! - `config`: engine settings (`ds-identify.cfg`)
//! - `output`: persisting the selection for the configuration stage
//! - `cli`, `commands`: the `dsid` binary

pub mod cli;
pub mod commands;
pub mod config;
pub mod datasource;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod output;

pub use error::{DsidError, Result};
