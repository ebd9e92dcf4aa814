// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations
//!
//! Each command renders to a `String` so output can be tested without
//! capturing stdout; `execute` prints it.

pub mod evidence;
pub mod identify;
pub mod list;

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;

/// Load settings from an explicit file, or from the default location under
/// `root`
pub fn load_settings(root: &Path, config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(root),
    }
}
