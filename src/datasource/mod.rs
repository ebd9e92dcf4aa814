// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Datasource catalogue
//!
//! The supported identifiers, the firmware signatures that identify them,
//! the fixed precedence used to break ties, and the availability probes used
//! for statically configured lists.

pub mod kind;
pub mod probe;
pub mod signature;

pub use kind::{Datasource, PRECEDENCE};
pub use probe::{AvailabilityProbe, EvidenceProbe};
