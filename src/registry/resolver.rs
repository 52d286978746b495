//! Service name resolution.

use axum::http::Uri;
use thiserror::Error;
use url::Url;

/// Errors raised while resolving or registering services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("service '{name}' registered twice")]
    DuplicateService { name: String },

    #[error("service '{name}' has invalid URL '{url}': {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
}

/// Resolves a logical service name to a network address.
///
/// The gateway and the inter-service client only ever talk to upstreams
/// through this trait, so tests can inject stub addresses and deployments
/// can plug in dynamic discovery.
pub trait ServiceResolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, service: &str) -> Result<ServiceAddress, RegistryError>;
}

/// Resolved location of an upstream service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    name: String,
    base_url: Url,
}

impl ServiceAddress {
    /// Parse and validate a base URL. Only plain `http` is supported.
    pub fn parse(name: impl Into<String>, url: &str) -> Result<Self, RegistryError> {
        let name = name.into();
        let invalid = |reason: String| RegistryError::InvalidUrl {
            name: name.clone(),
            url: url.to_string(),
            reason,
        };

        let base_url = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        if base_url.scheme() != "http" {
            return Err(invalid(format!("unsupported scheme '{}'", base_url.scheme())));
        }
        if base_url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }

        Ok(Self { name, base_url })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join the base URL with an inbound path and optional query.
    ///
    /// The path is appended verbatim; a base path such as `/v1` is kept as
    /// a prefix.
    pub fn upstream_uri(&self, path_and_query: &str) -> Result<Uri, axum::http::uri::InvalidUri> {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{path_and_query}").parse()
    }
}

impl std::fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_uri_joins_path_and_query() {
        let addr = ServiceAddress::parse("user-service", "http://localhost:8081").unwrap();
        let uri = addr.upstream_uri("/api/users/42?expand=true").unwrap();
        assert_eq!(uri.to_string(), "http://localhost:8081/api/users/42?expand=true");
    }

    #[test]
    fn test_upstream_uri_keeps_base_path() {
        let addr = ServiceAddress::parse("legacy", "http://10.0.0.5:9000/v1/").unwrap();
        let uri = addr.upstream_uri("/api/goals").unwrap();
        assert_eq!(uri.to_string(), "http://10.0.0.5:9000/v1/api/goals");
    }

    #[test]
    fn test_rejects_bad_urls() {
        for url in ["not a url", "https://localhost:8081", "http://localhost:8081/?a=b"] {
            assert!(
                matches!(ServiceAddress::parse("svc", url), Err(RegistryError::InvalidUrl { .. })),
                "{url} should be rejected"
            );
        }
    }
}
