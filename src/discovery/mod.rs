// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Legacy network discovery
//!
//! Last resort on DMI-capable platforms that no strict signal identified:
//! ask well-known link-local metadata services whether they answer. Every
//! probe is bounded by a request timeout and a fixed retry count.

pub mod http;
pub mod retry;

pub use http::HttpMetadataProber;
pub use retry::RetryConfig;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::datasource::Datasource;

/// Result of probing one datasource's metadata service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeOutcome {
    /// The service answered as expected
    Found,
    /// The service is absent or answered as something else
    NotFound,
    /// Every attempt timed out
    TimedOut,
}

/// Network collaborator used by the engine's discovery step
#[async_trait]
pub trait MetadataProber: Send + Sync {
    async fn probe(&self, datasource: Datasource) -> ProbeOutcome;
}

/// Where a datasource's metadata service answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Path appended to the base URL
    pub path: &'static str,
    /// Header the request must carry
    pub request_header: Option<(&'static str, &'static str)>,
    /// Header the response must echo for the answer to count
    pub response_header: Option<(&'static str, &'static str)>,
}

/// Metadata endpoint for a network-discoverable datasource
pub fn endpoint(datasource: Datasource) -> Option<Endpoint> {
    let plain = |path: &'static str| Endpoint {
        path,
        request_header: None,
        response_header: None,
    };

    match datasource {
        Datasource::OpenStack => Some(plain("/openstack/latest/meta_data.json")),
        Datasource::Ec2 => Some(plain("/latest/meta-data/instance-id")),
        Datasource::DigitalOcean => Some(plain("/metadata/v1.json")),
        Datasource::GCE => Some(Endpoint {
            path: "/computeMetadata/v1/instance/id",
            request_header: Some(("Metadata-Flavor", "Google")),
            response_header: Some(("Metadata-Flavor", "Google")),
        }),
        _ => None,
    }
}
