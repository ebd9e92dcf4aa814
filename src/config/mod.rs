// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for dsid
//!
//! Handles loading the identification policy and discovery bounds.

pub mod settings;

pub use settings::*;
