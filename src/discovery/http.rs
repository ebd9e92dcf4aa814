// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP metadata prober

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;

use super::{endpoint, Endpoint, MetadataProber, ProbeOutcome, RetryConfig};
use crate::config::DiscoveryConfig;
use crate::datasource::Datasource;
use crate::error::Result;

/// Outcome of a single HTTP attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Found,
    NotFound,
    Retry { timed_out: bool },
}

/// Probes link-local metadata services over HTTP
#[derive(Debug, Clone)]
pub struct HttpMetadataProber {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpMetadataProber {
    /// Build a prober bounded by the configured timeout and retries
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .user_agent(concat!("dsid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::from(config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn attempt(&self, datasource: Datasource, endpoint: &Endpoint) -> Attempt {
        let url = format!("{}{}", self.base_url, endpoint.path);
        let mut request = self.client.get(&url);
        if let Some((name, value)) = endpoint.request_header {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    if let Some((name, expected)) = endpoint.response_header {
                        let echoed = response
                            .headers()
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .is_some_and(|v| v == expected);
                        if !echoed {
                            tracing::debug!(
                                target: "dsid.discovery",
                                datasource = %datasource,
                                url = %url,
                                header = name,
                                "response missing identifying header"
                            );
                            return Attempt::NotFound;
                        }
                    }
                    Attempt::Found
                } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                    Attempt::Retry { timed_out: false }
                } else {
                    tracing::debug!(
                        target: "dsid.discovery",
                        datasource = %datasource,
                        url = %url,
                        status = status.as_u16(),
                        "metadata service rejected probe"
                    );
                    Attempt::NotFound
                }
            }
            Err(e) => {
                tracing::debug!(
                    target: "dsid.discovery",
                    datasource = %datasource,
                    url = %url,
                    error = %e,
                    "metadata probe failed"
                );
                Attempt::Retry {
                    timed_out: e.is_timeout(),
                }
            }
        }
    }
}

#[async_trait]
impl MetadataProber for HttpMetadataProber {
    async fn probe(&self, datasource: Datasource) -> ProbeOutcome {
        let Some(endpoint) = endpoint(datasource) else {
            return ProbeOutcome::NotFound;
        };

        let mut attempt = 0;
        loop {
            match self.attempt(datasource, &endpoint).await {
                Attempt::Found => return ProbeOutcome::Found,
                Attempt::NotFound => return ProbeOutcome::NotFound,
                Attempt::Retry { timed_out } => {
                    if attempt >= self.retry.max_retries {
                        return if timed_out {
                            ProbeOutcome::TimedOut
                        } else {
                            ProbeOutcome::NotFound
                        };
                    }

                    let delay = self.retry.calculate_delay(attempt);
                    tracing::debug!(
                        target: "dsid.discovery",
                        datasource = %datasource,
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "retrying metadata probe"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> DiscoveryConfig {
        DiscoveryConfig {
            base_url: server.uri(),
            timeout_ms: 500,
            retries: 1,
            base_delay_ms: 10,
            max_delay_ms: 20,
            jitter: 0.0,
            ..DiscoveryConfig::default()
        }
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = DiscoveryConfig {
            base_url: "http://169.254.169.254/".to_string(),
            ..DiscoveryConfig::default()
        };
        let prober = HttpMetadataProber::new(&config).unwrap();
        assert_eq!(prober.base_url(), "http://169.254.169.254");
    }

    #[tokio::test]
    async fn test_ec2_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/meta-data/instance-id"))
            .respond_with(ResponseTemplate::new(200).set_body_string("i-0052913950685138c"))
            .mount(&server)
            .await;

        let prober = HttpMetadataProber::new(&config_for(&server)).unwrap();
        assert_eq!(prober.probe(Datasource::Ec2).await, ProbeOutcome::Found);
        assert_eq!(prober.probe(Datasource::OpenStack).await, ProbeOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_gce_needs_echoed_flavor_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/computeMetadata/v1/instance/id"))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1234"))
            .mount(&server)
            .await;

        let prober = HttpMetadataProber::new(&config_for(&server)).unwrap();
        assert_eq!(prober.probe(Datasource::GCE).await, ProbeOutcome::NotFound);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/computeMetadata/v1/instance/id"))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Metadata-Flavor", "Google")
                    .set_body_string("1234"),
            )
            .mount(&server)
            .await;

        let prober = HttpMetadataProber::new(&config_for(&server)).unwrap();
        assert_eq!(prober.probe(Datasource::GCE).await, ProbeOutcome::Found);
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metadata/v1.json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let prober = HttpMetadataProber::new(&config_for(&server)).unwrap();
        assert_eq!(
            prober.probe(Datasource::DigitalOcean).await,
            ProbeOutcome::NotFound
        );
        server.verify().await;
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openstack/latest/meta_data.json"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(400)))
            .mount(&server)
            .await;

        let config = DiscoveryConfig {
            timeout_ms: 50,
            retries: 0,
            ..config_for(&server)
        };
        let prober = HttpMetadataProber::new(&config).unwrap();
        assert_eq!(
            prober.probe(Datasource::OpenStack).await,
            ProbeOutcome::TimedOut
        );
    }

    #[tokio::test]
    async fn test_non_discoverable_datasource_is_not_found() {
        let prober = HttpMetadataProber::new(&DiscoveryConfig::default()).unwrap();
        assert_eq!(
            prober.probe(Datasource::ConfigDrive).await,
            ProbeOutcome::NotFound
        );
    }
}
