//! Generic JSON client for calls between services.
//!
//! # Responsibilities
//! - Resolve the target service through a `ServiceResolver`
//! - Issue one request and await the response
//! - Map non-success statuses and malformed bodies to typed errors
//!
//! # Design Decisions
//! - No retries, no caching, no fallback values
//! - Every call carries a deadline (`TimeoutConfig::upstream_secs`)
//! - Dropping the returned future aborts the in-flight request

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::client::error::{ClientError, ClientResult};
use crate::client::request::ServiceRequest;
use crate::config::TimeoutConfig;
use crate::registry::ServiceResolver;

/// Client for synchronous request/response calls to named services.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    resolver: Arc<dyn ServiceResolver>,
}

impl ServiceClient {
    /// Build a client with connect and request deadlines from `timeouts`.
    pub fn new(resolver: Arc<dyn ServiceResolver>, timeouts: &TimeoutConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .no_proxy()
            .build()
            .map_err(|source| ClientError::Unavailable {
                service: "http-client".to_string(),
                source,
            })?;

        Ok(Self::with_http_client(resolver, http))
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_http_client(resolver: Arc<dyn ServiceResolver>, http: Client) -> Self {
        Self { http, resolver }
    }

    pub fn resolver(&self) -> &Arc<dyn ServiceResolver> {
        &self.resolver
    }

    /// Perform `request` against `service` and decode the JSON response.
    ///
    /// Suspends until the upstream answers or the deadline passes.
    pub async fn execute<T>(&self, service: &str, request: &ServiceRequest) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let address = self.resolver.resolve(service)?;
        let url = request.url(address.base_url())?;

        tracing::debug!(
            service = %service,
            method = %request.method,
            url = %url,
            "Calling service"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let unavailable = |source| ClientError::Unavailable {
            service: service.to_string(),
            source,
        };

        let response = builder.send().await.map_err(unavailable)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(unavailable)?;

        if !status.is_success() {
            tracing::warn!(service = %service, status = %status, "Service returned error status");
            return Err(ClientError::Status {
                service: service.to_string(),
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::warn!(service = %service, error = %source, "Failed to decode service response");
            ClientError::Decode {
                service: service.to_string(),
                source,
            }
        })
    }
}
